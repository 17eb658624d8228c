//! # http11_wire
//!
//! 依存なしの HTTP/1.1 リクエストパーサー / レスポンスエンコーダー (Sans I/O)
//!
//! ## 特徴
//!
//! - **依存なし**: 標準ライブラリのみ使用
//! - **Sans I/O**: I/O を完全に分離した設計
//! - **分割に非依存**: 1 バイトずつ届いても一度に届いても同じ結果になるインクリメンタルパーサー
//!
//! ## 使い方
//!
//! ### リクエスト受信
//!
//! ```rust
//! use http11_wire::{ParseWindow, RequestParser};
//!
//! let mut window = ParseWindow::with_capacity(1024);
//! let mut parser = RequestParser::new();
//!
//! // 受信データをウィンドウの末尾へ
//! window.extend(b"GET /coffee HTTP/1.1\r\nHost: localhost:3030\r\n\r\n");
//! let state = parser.pump(&mut window).unwrap();
//! assert!(state.is_terminal());
//!
//! let request = parser.into_request().unwrap();
//! assert_eq!(request.method(), "GET");
//! assert_eq!(request.target(), "/coffee");
//! ```
//!
//! ### レスポンス送信
//!
//! ```rust
//! use http11_wire::{CHUNKED_BODY_DONE, Headers, StatusCode, encode_chunk, encode_response};
//!
//! // 固定長
//! let bytes = encode_response(Some(&StatusCode::OK), None, b"Good!\n");
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//!
//! // chunked
//! let mut headers = Headers::new();
//! headers.set("Transfer-Encoding", "chunked").unwrap();
//! let mut bytes = encode_response(None, Some(&headers), b"");
//! bytes.extend_from_slice(&encode_chunk(b"hello"));
//! bytes.extend_from_slice(CHUNKED_BODY_DONE);
//! assert!(bytes.ends_with(b"5\r\nhello\r\n0\r\n\r\n"));
//! ```

mod encoder;
mod error;
pub mod headers;
mod limits;
mod parser;
mod request;
mod status;

pub use encoder::{
    CHUNKED_BODY_DONE, HTTP_VERSION, encode_chunk, encode_headers, encode_response,
    encode_status_line, encode_trailers,
};
pub use error::Error;
pub use headers::Headers;
pub use limits::DecoderLimits;
pub use parser::{ParseState, ParseWindow, RequestParser};
pub use request::{Request, RequestLine};
pub use status::StatusCode;
