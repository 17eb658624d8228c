#![no_main]

use arbitrary::Arbitrary;
use http11_wire::{DecoderLimits, ParseWindow, RequestParser};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzLimits {
    max_buffer_size: u16,
    max_line_size: u16,
    max_headers_count: u16,
    max_body_size: u32,
    read_size: u8,
    data: Vec<u8>,
}

fn build_limits(input: &FuzzLimits) -> DecoderLimits {
    DecoderLimits {
        max_buffer_size: (input.max_buffer_size as usize).max(1),
        max_line_size: input.max_line_size as usize,
        max_headers_count: input.max_headers_count as usize,
        max_body_size: input.max_body_size as usize,
    }
}

fuzz_target!(|input: FuzzLimits| {
    let limits = build_limits(&input);
    let mut window = ParseWindow::with_capacity(limits.max_buffer_size);
    let mut parser = RequestParser::with_limits(limits.clone());

    let read_size = (input.read_size as usize).max(1);
    let mut pending = &input.data[..];
    while !pending.is_empty() && !parser.state().is_terminal() {
        let n = pending.len().min(read_size);
        let copied = window.extend(&pending[..n]);
        pending = &pending[copied..];
        if parser.pump(&mut window).is_err() {
            break;
        }
    }
    let _ = parser.finish();

    let request = parser.request();
    if request.is_done() {
        assert!(request.headers().len() <= limits.max_headers_count);
    }
    assert!(request.body().len() <= limits.max_body_size);
    assert!(window.len() <= limits.max_buffer_size);
});
