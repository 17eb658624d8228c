//! tokio_http11_wire - Tokio integration for http11_wire
//!
//! tokio を使用した HTTP/1.1 の接続ドライバーとサーバー。
//!
//! ## 特徴
//!
//! - **http11_wire ベース**: Sans I/O のパーサー / エンコーダーをトランスポートに結び付ける
//! - **非同期 I/O**: tokio による完全非同期対応
//! - **1 接続 1 リクエスト**: Keep-Alive はサポートしない (`Connection: close`)
//!
//! ## サーバー
//!
//! ```ignore
//! use tokio_http11_wire::{Handler, HandlerError, Request, ResponseWriter, Server, StatusCode};
//! use tokio::io::AsyncWrite;
//!
//! struct Hello;
//!
//! impl Handler for Hello {
//!     async fn handle<W>(
//!         &self,
//!         request: &Request,
//!         writer: &mut ResponseWriter<W>,
//!     ) -> Result<(), HandlerError>
//!     where
//!         W: AsyncWrite + Unpin + Send,
//!     {
//!         if request.target() == "/not" {
//!             return Err(HandlerError::with_message(StatusCode::NOT_FOUND, "Nothing to say :("));
//!         }
//!         writer.write(None, None, b"Good!\n").await?;
//!         Ok(())
//!     }
//! }
//!
//! let server = Server::bind("0.0.0.0:3030").await?;
//! server.serve_with_shutdown(Hello, tokio_http11_wire::shutdown_signal()).await?;
//! ```

pub mod connection;
pub mod error;
pub mod handler;
pub mod response_writer;
pub mod server;

pub use connection::serve_connection;
pub use error::{Error, Result};
pub use handler::{Handler, HandlerError};
pub use response_writer::ResponseWriter;
pub use server::{DEFAULT_READ_CHUNK_SIZE, Server, ServerConfig, shutdown_signal};

// http11_wire の型を re-export
pub use http11_wire::{DecoderLimits, Headers, Request, StatusCode};
