//! リクエストハンドラー

use std::fmt;
use std::future::Future;

use http11_wire::headers::{CONNECTION, CONTENT_TYPE};
use http11_wire::{Headers, Request, StatusCode};
use tokio::io::AsyncWrite;

use crate::response_writer::ResponseWriter;

/// HTTP リクエストハンドラー
///
/// パース済みのリクエストと、同じ接続に結び付いた [`ResponseWriter`] を受け取る。
/// エラーを返すとドライバーがエラーレスポンスを書き込んで接続を閉じる。
pub trait Handler: Send + Sync + 'static {
    /// リクエストを処理してレスポンスを書き込む
    fn handle<W>(
        &self,
        request: &Request,
        writer: &mut ResponseWriter<W>,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send
    where
        W: AsyncWrite + Unpin + Send;
}

/// ハンドラーエラー
///
/// メッセージがあれば JSON (`{"statusCode":N,"errorMessage":"..."}`)、
/// なければ `<code> <reason>` のテキストとして返す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    status: StatusCode,
    message: Option<String>,
}

impl HandlerError {
    /// メッセージなしのエラーを作成
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
        }
    }

    /// メッセージ付きのエラーを作成
    pub fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    /// パースエラーを 4xx に対応付ける
    ///
    /// 行が長すぎる / ヘッダーが多すぎる場合は 431、ボディが大きすぎる場合は 413、
    /// それ以外は 400。
    pub fn from_parse_error(e: &http11_wire::Error) -> Self {
        let status = match e {
            http11_wire::Error::LineTooLong { .. } | http11_wire::Error::TooManyHeaders { .. } => {
                StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE
            }
            http11_wire::Error::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::with_message(status, e.to_string())
    }

    /// ステータス
    pub fn status(&self) -> &StatusCode {
        &self.status
    }

    /// メッセージ
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// レスポンスのヘッダーとボディを組み立てる
    ///
    /// Content-Length は書き込み時に付与される。
    pub fn render(&self) -> Result<(Headers, Vec<u8>), http11_wire::Error> {
        let (content_type, body) = match &self.message {
            Some(message) => {
                let code = self.status.code();
                let json = nojson::json(|f| {
                    f.object(|f| {
                        f.member("statusCode", code)?;
                        f.member("errorMessage", message.as_str())
                    })
                });
                ("application/json", format!("{json}\n"))
            }
            None => ("text/plain", format!("{}\n", self.status)),
        };
        let mut headers = Headers::new();
        headers.set(CONTENT_TYPE, content_type)?;
        headers.set(CONNECTION, "close")?;
        Ok((headers, body.into_bytes()))
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.status, message),
            None => write!(f, "{}", self.status),
        }
    }
}

impl std::error::Error for HandlerError {}

impl From<crate::error::Error> for HandlerError {
    fn from(e: crate::error::Error) -> Self {
        Self::with_message(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

/// ハンドラー内でのヘッダー設定の失敗などは 500 にする
impl From<http11_wire::Error> for HandlerError {
    fn from(e: http11_wire::Error) -> Self {
        Self::with_message(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}
