#![no_main]

use http11_wire::{Headers, encode_headers};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut headers = Headers::new();
    let Ok((consumed, done)) = headers.parse_all(data) else {
        return;
    };
    assert!(consumed <= data.len());

    // パースできたヘッダーはエンコードし直しても同じ内容になる
    if done {
        let encoded = encode_headers(&headers);
        let mut reparsed = Headers::new();
        assert_eq!(reparsed.parse_all(&encoded), Ok((encoded.len(), true)));
        assert_eq!(reparsed, headers);
    }
});
