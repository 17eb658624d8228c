//! トランスポートに結び付いたレスポンスエンコーダー
//!
//! 各メソッドは `http11_wire` のエンコード関数で組み立てたバイト列を 1 回の
//! `write_all` で送る。内部でバッファリングはしない。
//!
//! ```ignore
//! use tokio_http11_wire::{Headers, ResponseWriter, StatusCode};
//!
//! let mut writer = ResponseWriter::new(stream);
//!
//! // 固定長
//! writer.write(Some(&StatusCode::OK), None, b"Good!\n").await?;
//!
//! // chunked + トレーラー
//! let mut headers = Headers::new();
//! headers.set("Transfer-Encoding", "chunked")?;
//! headers.set("Trailer", "x-checksum")?;
//! writer.write_status_line(&StatusCode::OK).await?;
//! writer.write_headers(&headers).await?;
//! writer.write_chunked_body(b"hello").await?;
//! writer.write_trailers(&trailers).await?;
//! ```

use std::time::Duration;

use http11_wire::{
    CHUNKED_BODY_DONE, Headers, StatusCode, encode_chunk, encode_headers, encode_response,
    encode_status_line, encode_trailers,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::Result;

/// レスポンスエンコーダー
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    write_timeout: Option<Duration>,
    written: usize,
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    /// 書き込み先を指定して作成
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            write_timeout: None,
            written: 0,
        }
    }

    /// 1 回の書き込みごとのタイムアウトを設定 (`None` で無制限)
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// これまでに書き込んだバイト数
    pub fn written(&self) -> usize {
        self.written
    }

    /// 1 バイトでも書き込み済みか
    pub fn is_started(&self) -> bool {
        self.written > 0
    }

    /// 書き込み先への参照
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// 書き込み先を取り出す
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// ステータス行を書き込む
    pub async fn write_status_line(&mut self, status: &StatusCode) -> Result<()> {
        self.send(&encode_status_line(status)).await
    }

    /// ヘッダーブロックを書き込む (終端の空行を含む)
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<()> {
        self.send(&encode_headers(headers)).await
    }

    /// ステータス行、ヘッダー、ボディをまとめて書き込む
    ///
    /// 省略時の扱いは [`http11_wire::encode_response`] と同じ。
    pub async fn write(
        &mut self,
        status: Option<&StatusCode>,
        headers: Option<&Headers>,
        body: &[u8],
    ) -> Result<()> {
        self.send(&encode_response(status, headers, body)).await
    }

    /// チャンクを 1 つ書き込む
    ///
    /// 空のチャンクは何も書き込まない。
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        self.send(&encode_chunk(chunk)).await
    }

    /// 終端チャンクを書き込む
    pub async fn write_chunked_body_done(&mut self) -> Result<()> {
        self.send(CHUNKED_BODY_DONE).await
    }

    /// トレーラー付きの終端を書き込む
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<()> {
        self.send(&encode_trailers(trailers)).await
    }

    /// フラッシュ
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// 書き込み側を閉じる
    pub async fn shutdown(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<()> {
        match self.write_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.writer.write_all(bytes)).await??,
            None => self.writer.write_all(bytes).await?,
        }
        self.written += bytes.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_default_response() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer
            .write(Some(&StatusCode::OK), None, b"Good!\n")
            .await
            .unwrap();
        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert!(output.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(output.contains("content-length: 6\r\n"));
        assert!(output.ends_with("\r\n\r\nGood!\n"));
    }

    #[tokio::test]
    async fn write_chunked() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_chunked_body(b"hello").await.unwrap();
        writer.write_chunked_body(b"").await.unwrap();
        writer.write_chunked_body_done().await.unwrap();
        assert_eq!(writer.written(), 15);
        assert_eq!(writer.into_inner(), b"5\r\nhello\r\n0\r\n\r\n");
    }

    #[tokio::test]
    async fn write_trailers() {
        let mut trailers = Headers::new();
        trailers.set("X-Checksum", "abc").unwrap();

        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_chunked_body(b"hello").await.unwrap();
        writer.write_trailers(&trailers).await.unwrap();
        assert_eq!(
            writer.into_inner(),
            b"5\r\nhello\r\n0\r\nx-checksum: abc\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn write_status_line_and_headers() {
        let mut headers = Headers::new();
        headers.set("Transfer-Encoding", "chunked").unwrap();

        let mut writer = ResponseWriter::new(Vec::new());
        assert!(!writer.is_started());
        writer
            .write_status_line(&StatusCode::NOT_FOUND)
            .await
            .unwrap();
        assert!(writer.is_started());
        writer.write_headers(&headers).await.unwrap();
        assert_eq!(
            writer.get_ref().as_slice(),
            b"HTTP/1.1 404 Not Found\r\ntransfer-encoding: chunked\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn write_with_timeout() {
        let mut writer =
            ResponseWriter::new(Vec::new()).with_write_timeout(Some(Duration::from_secs(5)));
        writer.write_chunked_body_done().await.unwrap();
        assert_eq!(writer.into_inner(), CHUNKED_BODY_DONE);
    }
}
