//! HTTP/1.1 リクエストパーサーモジュール
//!
//! Sans I/O 設計のインクリメンタルパーサーと、読み取り用の固定容量ウィンドウを提供。
//!
//! ## 使い方
//!
//! トランスポートから読んだバイト列をウィンドウの末尾に追加し、
//! [`RequestParser::pump`] で消費された分を左に詰める。これを終端状態まで繰り返す。
//!
//! ```rust
//! use http11_wire::{ParseWindow, RequestParser};
//!
//! let mut window = ParseWindow::with_capacity(64);
//! let mut parser = RequestParser::new();
//!
//! // 1 バイトずつ届いても結果は同じ
//! for b in b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n" {
//!     window.extend(&[*b]);
//!     if parser.pump(&mut window).unwrap().is_terminal() {
//!         break;
//!     }
//! }
//!
//! let request = parser.into_request().unwrap();
//! assert_eq!(request.target(), "/index.html");
//! assert_eq!(request.headers().get("Host"), "example.com");
//! ```

mod request;
mod state;
mod window;

// 公開 API
pub use request::RequestParser;
pub use state::ParseState;
pub use window::ParseWindow;
