#![no_main]

use http11_wire::{ParseWindow, RequestParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // データを一度に parse
    let mut whole = RequestParser::new();
    let whole_result = whole.parse(data).and_then(|_| whole.finish());

    // データを分割してウィンドウへ流し込む (ストリーミングシナリオ)
    let mut split = RequestParser::new();
    let mut window = ParseWindow::with_capacity(split.limits().max_buffer_size);
    let mut split_result = Ok(());
    for chunk in data.chunks(17) {
        if split.state().is_terminal() {
            break;
        }
        window.extend(chunk);
        if let Err(e) = split.pump(&mut window) {
            split_result = Err(e);
            break;
        }
    }
    if split_result.is_ok() && !split.state().is_terminal() {
        split_result = split.finish();
    }

    // 一度に読めたものは分割しても同じ結果になる
    // (逆は成り立たない: 宣言を超えるボディは区切り次第で Done の後ろに残る)
    if whole_result.is_ok() && data.len() <= window.capacity() {
        assert!(split_result.is_ok());
        assert_eq!(whole.consumed(), split.consumed());
        assert_eq!(whole.request(), split.request());
    }
});
