//! レスポンスエンコーダー
//!
//! どの関数も状態を持たず、1 回の書き込みで送るバイト列をそのまま返す。

use std::borrow::Cow;

use crate::headers::{CONTENT_LENGTH, Headers};
use crate::status::StatusCode;

/// レスポンスの HTTP バージョン
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// 終端チャンク (トレーラーなし)
pub const CHUNKED_BODY_DONE: &[u8] = b"0\r\n\r\n";

/// ステータス行をエンコード
///
/// `HTTP/1.1 <code> <reason>\r\n`
pub fn encode_status_line(status: &StatusCode) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HTTP_VERSION.len() + status.reason().len() + 7);
    put_status_line(&mut buf, status);
    buf
}

/// ヘッダーブロックをエンコード (終端の空行を含む)
///
/// 出力順は不定。
pub fn encode_headers(headers: &Headers) -> Vec<u8> {
    let mut buf = Vec::new();
    put_fields(&mut buf, headers);
    buf.extend_from_slice(b"\r\n");
    buf
}

/// レスポンス全体をエンコード
///
/// - `status` が `None` なら `200 OK`
/// - `headers` が `None` ならデフォルトヘッダー ([`Headers::with_defaults`])
/// - `headers` に Content-Length がなく、ボディが空でなければ Content-Length を付与
pub fn encode_response(
    status: Option<&StatusCode>,
    headers: Option<&Headers>,
    body: &[u8],
) -> Vec<u8> {
    let status = status.unwrap_or(&StatusCode::OK);
    let headers = match headers {
        None => Cow::Owned(Headers::with_defaults(body.len())),
        Some(h) if !body.is_empty() && !h.contains(CONTENT_LENGTH) => {
            let mut h = h.clone();
            h.insert_trusted(CONTENT_LENGTH, body.len().to_string());
            Cow::Owned(h)
        }
        Some(h) => Cow::Borrowed(h),
    };

    let mut buf = Vec::with_capacity(128 + body.len());
    put_status_line(&mut buf, status);
    put_fields(&mut buf, &headers);
    buf.extend_from_slice(b"\r\n");
    buf.extend_from_slice(body);
    buf
}

/// Chunked Transfer Encoding 用のチャンクをエンコード
///
/// サイズは小文字の 16 進数。長さ 0 は終端用なので、空のデータには何も出力しない。
pub fn encode_chunk(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let mut buf = Vec::with_capacity(data.len() + 20);
    buf.extend_from_slice(format!("{:x}\r\n", data.len()).as_bytes());
    buf.extend_from_slice(data);
    buf.extend_from_slice(b"\r\n");
    buf
}

/// トレーラー付きの終端をエンコード
///
/// `0\r\n` の後にトレーラー行を並べ、空行で閉じる。
/// [`CHUNKED_BODY_DONE`] の代わりに使う。
pub fn encode_trailers(trailers: &Headers) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"0\r\n");
    put_fields(&mut buf, trailers);
    buf.extend_from_slice(b"\r\n");
    buf
}

fn put_status_line(buf: &mut Vec<u8>, status: &StatusCode) {
    buf.extend_from_slice(HTTP_VERSION.as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(status.code().to_string().as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(status.reason().as_bytes());
    buf.extend_from_slice(b"\r\n");
}

fn put_fields(buf: &mut Vec<u8>, headers: &Headers) {
    for (name, value) in headers {
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: &[u8]) -> &str {
        std::str::from_utf8(bytes).unwrap()
    }

    #[test]
    fn status_line() {
        assert_eq!(
            encode_status_line(&StatusCode::OK),
            b"HTTP/1.1 200 OK\r\n"
        );
        assert_eq!(
            encode_status_line(&StatusCode::NOT_FOUND),
            b"HTTP/1.1 404 Not Found\r\n"
        );
    }

    #[test]
    fn headers_block() {
        let mut headers = Headers::new();
        headers.set("X-Custom-Header", "Im-header").unwrap();
        assert_eq!(
            encode_headers(&headers),
            b"x-custom-header: Im-header\r\n\r\n"
        );
        assert_eq!(encode_headers(&Headers::new()), b"\r\n");
    }

    #[test]
    fn default_response() {
        let output = encode_response(None, None, b"Good!\n");
        let output = text(&output);
        assert!(output.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(output.contains("content-length: 6\r\n"));
        assert!(output.contains("content-type: text/plain\r\n"));
        assert!(output.contains("connection: close\r\n"));
        assert!(output.ends_with("\r\n\r\nGood!\n"));
    }

    #[test]
    fn explicit_ok_without_headers() {
        let output = encode_response(Some(&StatusCode::OK), None, b"Good!\n");
        // ヘッダーの順序は不定なので長さと前後だけ比較する
        assert_eq!(output.len(), encode_response(None, None, b"Good!\n").len());
        assert!(output.starts_with(b"HTTP/1.1 200 OK\r\n"));
        assert!(output.ends_with(b"\r\n\r\nGood!\n"));
    }

    #[test]
    fn provided_headers_get_content_length() {
        let mut headers = Headers::new();
        headers.set("X-Another-Header", "not-alone").unwrap();
        let output = encode_response(Some(&StatusCode::OK), Some(&headers), b"Im full!");
        let output = text(&output);
        assert!(output.contains("content-length: 8\r\n"));
        assert!(output.contains("x-another-header: not-alone\r\n"));
        assert!(output.ends_with("\r\n\r\nIm full!"));
        // 呼び出し側のテーブルは変更しない
        assert!(!headers.contains("content-length"));
    }

    #[test]
    fn provided_content_length_is_kept() {
        let mut headers = Headers::new();
        headers.set("Content-Length", "3").unwrap();
        let output = encode_response(None, Some(&headers), b"abc");
        assert_eq!(output, b"HTTP/1.1 200 OK\r\ncontent-length: 3\r\n\r\nabc");
    }

    #[test]
    fn provided_headers_empty_body() {
        let mut headers = Headers::new();
        headers.set("Transfer-Encoding", "chunked").unwrap();
        let output = encode_response(Some(&StatusCode::NOT_FOUND), Some(&headers), b"");
        assert_eq!(
            output,
            b"HTTP/1.1 404 Not Found\r\ntransfer-encoding: chunked\r\n\r\n"
        );
    }

    #[test]
    fn chunk_hex_size() {
        assert_eq!(encode_chunk(b"hello"), b"5\r\nhello\r\n");
        assert_eq!(
            encode_chunk(b"this is a chunk of you"),
            b"16\r\nthis is a chunk of you\r\n"
        );
        assert_eq!(encode_chunk(b"little chunk"), b"c\r\nlittle chunk\r\n");
        assert_eq!(encode_chunk(&[0u8; 255])[..4], *b"ff\r\n");
    }

    #[test]
    fn empty_chunk_writes_nothing() {
        assert!(encode_chunk(b"").is_empty());
    }

    #[test]
    fn chunked_body_done() {
        let mut output = encode_chunk(b"hello");
        output.extend_from_slice(CHUNKED_BODY_DONE);
        assert_eq!(output, b"5\r\nhello\r\n0\r\n\r\n");
    }

    #[test]
    fn trailers() {
        let mut trailers = Headers::new();
        trailers.set("X-Checksum", "abc").unwrap();
        assert_eq!(encode_trailers(&trailers), b"0\r\nx-checksum: abc\r\n\r\n");
    }

    #[test]
    fn trailers_multiple() {
        let mut trailers = Headers::new();
        trailers.set("X-Checksum", "abcde12345").unwrap();
        trailers.set("Expires", "Wed, 21 Oct 2025 07:28:00 GMT").unwrap();
        let output = encode_trailers(&trailers);
        let output = text(&output);
        assert!(output.starts_with("0\r\n"));
        assert!(output.contains("x-checksum: abcde12345\r\n"));
        assert!(output.contains("expires: Wed, 21 Oct 2025 07:28:00 GMT\r\n"));
        assert!(output.ends_with("\r\n\r\n"));
    }

    #[test]
    fn empty_trailers() {
        assert_eq!(encode_trailers(&Headers::new()), CHUNKED_BODY_DONE);
    }
}
