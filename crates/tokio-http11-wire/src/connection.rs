//! 接続ドライバー
//!
//! トランスポートから読み取ったバイト列をパーサーへ流し込み、リクエストが完成したら
//! 同じトランスポートに結び付いた [`ResponseWriter`] と一緒にハンドラーへ渡す。
//! 1 接続につき 1 リクエストを処理して閉じる。

use std::time::Duration;

use http11_wire::{ParseWindow, Request, RequestParser};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::error::{Error, Result};
use crate::handler::{Handler, HandlerError};
use crate::response_writer::ResponseWriter;
use crate::server::ServerConfig;

/// エラーレスポンスの後に読み捨てる最大バイト数
const MAX_DRAIN_SIZE: usize = 1024 * 1024;

/// 読み取りタイムアウト未設定時に読み捨てで待つ時間
const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// 1 つの接続を処理する
///
/// - 何も受信しないまま閉じられた場合は `Ok(())`
/// - パースエラーは 4xx を書き込んだ後に `Error::Http` を返す
/// - ハンドラーエラーはエラーレスポンスを書き込んで `Ok(())`
/// - トランスポートのエラーとタイムアウトはレスポンスを書かずにそのまま返す
pub async fn serve_connection<S, H>(stream: S, config: &ServerConfig, handler: &H) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    H: Handler,
{
    let (mut reader, writer) = tokio::io::split(stream);
    let mut writer = ResponseWriter::new(writer).with_write_timeout(config.write_timeout);

    let request = match read_request(&mut reader, config).await {
        Ok(request) => request,
        Err(Error::ConnectionClosed) => {
            tracing::debug!("connection closed before any request data");
            return Ok(());
        }
        Err(Error::Http(e)) if e.is_malformed_input() => {
            write_error(&mut writer, &HandlerError::from_parse_error(&e)).await?;
            writer.shutdown().await?;
            // 未読のデータを残して閉じると RST でレスポンスが失われる
            drain(&mut reader, config).await;
            return Err(Error::Http(e));
        }
        Err(e) => return Err(e),
    };

    tracing::debug!(
        method = request.method(),
        target = request.target(),
        version = request.version(),
        body_len = request.body().len(),
        "request parsed"
    );

    if let Err(e) = handler.handle(&request, &mut writer).await {
        if writer.is_started() {
            // レスポンスの途中なのでエラーレスポンスは書けない
            tracing::warn!(error = %e, written = writer.written(), "handler failed mid-response");
        } else {
            if e.status().is_server_error() {
                tracing::warn!(error = %e, "handler failed");
            } else {
                tracing::debug!(error = %e, "handler returned error");
            }
            write_error(&mut writer, &e).await?;
        }
    }

    writer.flush().await?;
    writer.shutdown().await?;
    Ok(())
}

/// リクエストが完成するかエラーになるまで読み取る
async fn read_request<R>(reader: &mut R, config: &ServerConfig) -> Result<Request>
where
    R: AsyncRead + Unpin,
{
    let mut window = ParseWindow::with_capacity(config.limits.max_buffer_size);
    let mut parser = RequestParser::with_limits(config.limits.clone());

    loop {
        let spare = window.spare_mut();
        let len = spare.len().min(config.read_chunk_size);
        let read = reader.read(&mut spare[..len]);
        let n = match config.read_timeout {
            Some(timeout) => tokio::time::timeout(timeout, read).await??,
            None => read.await?,
        };

        if n == 0 {
            match parser.finish() {
                Err(http11_wire::Error::ConnectionClosed) => return Err(Error::ConnectionClosed),
                result => result?,
            }
            break;
        }

        window.commit(n);
        if parser.pump(&mut window)?.is_terminal() {
            break;
        }
    }

    Ok(parser.into_request()?)
}

/// 相手が送信を終えるまで受信データを読み捨てる
///
/// 上限バイト数かタイムアウトに達したら諦める。
async fn drain<R>(reader: &mut R, config: &ServerConfig)
where
    R: AsyncRead + Unpin,
{
    let timeout = config.read_timeout.unwrap_or(DRAIN_TIMEOUT);
    let mut buf = vec![0; config.read_chunk_size.max(1)];
    let mut drained = 0;

    while drained < MAX_DRAIN_SIZE {
        match tokio::time::timeout(timeout, reader.read(&mut buf)).await {
            Ok(Ok(0)) | Ok(Err(_)) | Err(_) => break,
            Ok(Ok(n)) => drained += n,
        }
    }
    tracing::debug!(drained, "discarded unread request data");
}

async fn write_error<W>(writer: &mut ResponseWriter<W>, error: &HandlerError) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let (headers, body) = error.render()?;
    writer
        .write(Some(error.status()), Some(&headers), &body)
        .await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    use http11_wire::{DecoderLimits, StatusCode};
    use tokio::io::AsyncWriteExt;

    struct Hello;

    impl Handler for Hello {
        async fn handle<W>(
            &self,
            request: &Request,
            writer: &mut ResponseWriter<W>,
        ) -> std::result::Result<(), HandlerError>
        where
            W: AsyncWrite + Unpin + Send,
        {
            if request.target() == "/missing" {
                return Err(HandlerError::new(StatusCode::NOT_FOUND));
            }
            writer.write(None, None, b"Good!\n").await?;
            Ok(())
        }
    }

    async fn roundtrip(config: ServerConfig, input: &[u8]) -> (Result<()>, String) {
        let (mut client, server) = tokio::io::duplex(64 * 1024);
        client.write_all(input).await.unwrap();
        client.shutdown().await.unwrap();

        let result = serve_connection(server, &config, &Hello).await;
        let mut output = String::new();
        client.read_to_string(&mut output).await.unwrap();
        (result, output)
    }

    #[tokio::test]
    async fn serves_one_request() {
        let (result, output) =
            roundtrip(ServerConfig::default(), b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
        assert!(result.is_ok());
        assert!(output.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(output.ends_with("\r\n\r\nGood!\n"));
    }

    #[tokio::test]
    async fn small_reads() {
        let config = ServerConfig {
            read_chunk_size: 1,
            ..ServerConfig::default()
        };
        let (result, output) =
            roundtrip(config, b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc").await;
        assert!(result.is_ok());
        assert!(output.starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[tokio::test]
    async fn handler_error_without_message() {
        let (result, output) =
            roundtrip(ServerConfig::default(), b"GET /missing HTTP/1.1\r\n\r\n").await;
        assert!(result.is_ok());
        assert!(output.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(output.contains("content-type: text/plain\r\n"));
        assert!(output.ends_with("\r\n\r\n404 Not Found\n"));
    }

    #[tokio::test]
    async fn malformed_request_line() {
        let (result, output) =
            roundtrip(ServerConfig::default(), b"/coffee HTTP/1.1\r\n\r\n").await;
        assert!(matches!(
            result,
            Err(Error::Http(http11_wire::Error::MalformedRequestLine(_)))
        ));
        assert!(output.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(output.contains("content-type: application/json\r\n"));
        assert!(output.contains("\"statusCode\":400"));
    }

    #[tokio::test]
    async fn truncated_body() {
        let (result, output) = roundtrip(
            ServerConfig::default(),
            b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc",
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::Http(http11_wire::Error::TruncatedBody {
                expected: 10,
                received: 3
            }))
        ));
        assert!(output.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[tokio::test]
    async fn header_line_too_long() {
        let config = ServerConfig {
            limits: DecoderLimits {
                max_line_size: 32,
                ..DecoderLimits::default()
            },
            ..ServerConfig::default()
        };
        let input = format!("GET / HTTP/1.1\r\nX-Long: {}\r\n\r\n", "a".repeat(64));
        let (result, output) = roundtrip(config, input.as_bytes()).await;
        assert!(matches!(
            result,
            Err(Error::Http(http11_wire::Error::LineTooLong { .. }))
        ));
        assert!(output.starts_with("HTTP/1.1 431 Request Header Fields Too Large\r\n"));
    }

    #[tokio::test]
    async fn closed_without_data() {
        let (result, output) = roundtrip(ServerConfig::default(), b"").await;
        assert!(result.is_ok());
        assert!(output.is_empty());
    }
}
