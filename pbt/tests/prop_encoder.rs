//! Encoder のプロパティテスト (encoder.rs)

use http11_wire::{
    CHUNKED_BODY_DONE, Headers, RequestParser, StatusCode, encode_chunk, encode_response,
    encode_status_line, encode_trailers,
};
use pbt::{body, header_map};
use proptest::prelude::*;

fn table(map: &std::collections::BTreeMap<String, String>) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        headers.set(name, value).unwrap();
    }
    headers
}

/// ステータス行とヘッダーブロックを読み飛ばし、ヘッダーとボディを返す
fn split_response(data: &[u8]) -> (Headers, &[u8]) {
    let line_end = data.windows(2).position(|w| w == b"\r\n").unwrap();
    let mut headers = Headers::new();
    let (consumed, done) = headers.parse_all(&data[line_end + 2..]).unwrap();
    assert!(done);
    (headers, &data[line_end + 2 + consumed..])
}

// ========================================
// ステータス行
// ========================================

proptest! {
    #[test]
    fn prop_status_line(
        code in 100u16..600,
        reason in prop::sample::select(vec!["OK", "Not Found", "Teapot"]),
    ) {
        let status = StatusCode::new(code, reason);
        let line = encode_status_line(&status);
        prop_assert_eq!(line, format!("HTTP/1.1 {code} {reason}\r\n").into_bytes());
    }
}

// ========================================
// レスポンス
// ========================================

proptest! {
    #[test]
    fn prop_default_headers(body in body()) {
        let output = encode_response(None, None, &body);
        prop_assert!(output.starts_with(b"HTTP/1.1 200 OK\r\n"));

        let (headers, rest) = split_response(&output);
        prop_assert_eq!(headers.content_length(), body.len());
        prop_assert_eq!(headers.get("content-type"), "text/plain");
        prop_assert_eq!(headers.get("connection"), "close");
        prop_assert_eq!(rest, &body[..]);
    }

    #[test]
    fn prop_content_length_injected(map in header_map(), body in body()) {
        let headers = table(&map);
        let output = encode_response(Some(&StatusCode::OK), Some(&headers), &body);

        let (parsed, rest) = split_response(&output);
        prop_assert_eq!(rest, &body[..]);
        if body.is_empty() {
            prop_assert_eq!(parsed, headers);
        } else {
            prop_assert_eq!(parsed.content_length(), body.len());
            prop_assert_eq!(parsed.len(), headers.len() + 1);
        }
    }

    #[test]
    fn prop_response_readable_as_request_body(map in header_map(), body in body()) {
        // 同じフレーミングなのでステータス行を差し替えればパーサーで読める
        let output = encode_response(None, Some(&table(&map)), &body);
        let line_end = output.windows(2).position(|w| w == b"\r\n").unwrap();
        let mut data = b"POST / HTTP/1.1".to_vec();
        data.extend_from_slice(&output[line_end..]);

        let mut parser = RequestParser::new();
        prop_assert_eq!(parser.parse(&data), Ok(data.len()));
        let req = parser.into_request().unwrap();
        prop_assert_eq!(req.body(), &body[..]);
    }
}

// ========================================
// chunked
// ========================================

/// chunked ボディを復元する (トレーラーは返さない)
fn dechunk(mut data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let line_end = data.windows(2).position(|w| w == b"\r\n").unwrap();
        let size =
            usize::from_str_radix(std::str::from_utf8(&data[..line_end]).unwrap(), 16).unwrap();
        data = &data[line_end + 2..];
        if size == 0 {
            return out;
        }
        out.extend_from_slice(&data[..size]);
        assert_eq!(&data[size..size + 2], b"\r\n");
        data = &data[size + 2..];
    }
}

proptest! {
    #[test]
    fn prop_chunks_reassemble(
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..300), 0..8),
    ) {
        let mut encoded = Vec::new();
        for chunk in &chunks {
            encoded.extend_from_slice(&encode_chunk(chunk));
        }
        encoded.extend_from_slice(CHUNKED_BODY_DONE);

        prop_assert_eq!(dechunk(&encoded), chunks.concat());
    }

    #[test]
    fn prop_chunk_size_is_lower_hex(chunk in proptest::collection::vec(any::<u8>(), 1..1024)) {
        let encoded = encode_chunk(&chunk);
        let prefix = format!("{:x}\r\n", chunk.len());
        prop_assert!(encoded.starts_with(prefix.as_bytes()));
        prop_assert_eq!(encoded.len(), prefix.len() + chunk.len() + 2);
        prop_assert!(!prefix.bytes().any(|b| b.is_ascii_uppercase()));
    }

    #[test]
    fn prop_trailers_parse_back(map in header_map()) {
        let trailers = table(&map);
        let encoded = encode_trailers(&trailers);
        prop_assert!(encoded.starts_with(b"0\r\n"));

        let mut parsed = Headers::new();
        let (consumed, done) = parsed.parse_all(&encoded[3..]).unwrap();
        prop_assert!(done);
        prop_assert_eq!(consumed + 3, encoded.len());
        prop_assert_eq!(parsed, trailers);
    }
}
