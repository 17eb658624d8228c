//! デモ用のルート

use http11_wire::headers::{CONTENT_TYPE, TRAILER, TRANSFER_ENCODING};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWrite;
use tokio_http11_wire::{Handler, HandlerError, Headers, Request, ResponseWriter, StatusCode};

/// chunked で送るときの 1 チャンクの大きさ
const CHUNK_SIZE: usize = 100;
const PATTERN: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// リクエストターゲットで振り分けるハンドラー
pub struct Routes;

impl Handler for Routes {
    async fn handle<W>(
        &self,
        request: &Request,
        writer: &mut ResponseWriter<W>,
    ) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        match request.target() {
            "/not" => Err(HandlerError::with_message(
                StatusCode::NOT_FOUND,
                "Nothing to say :(",
            )),
            "/bad" => Err(HandlerError::new(StatusCode::BAD_REQUEST)),
            "/server-error" => Err(HandlerError::with_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                "My bad :|",
            )),
            "/chunked" => chunked(writer).await,
            "/chunked-trailer" => chunked_with_trailers(writer).await,
            _ => {
                writer.write(Some(&StatusCode::OK), None, b"Good!\n").await?;
                Ok(())
            }
        }
    }
}

/// `A..Z` を繰り返したデータを作る
pub fn generate_data(size: usize) -> Vec<u8> {
    PATTERN.iter().copied().cycle().take(size).collect()
}

fn chunked_headers() -> Result<Headers, HandlerError> {
    let mut headers = Headers::new();
    headers.set(CONTENT_TYPE, "text/plain")?;
    headers.set(TRANSFER_ENCODING, "chunked")?;
    Ok(headers)
}

async fn chunked<W>(writer: &mut ResponseWriter<W>) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let headers = chunked_headers()?;
    writer.write(Some(&StatusCode::OK), Some(&headers), b"").await?;

    let data = generate_data(1024);
    for chunk in data.chunks(CHUNK_SIZE) {
        writer.write_chunked_body(chunk).await?;
    }
    writer.write_chunked_body_done().await?;
    Ok(())
}

async fn chunked_with_trailers<W>(writer: &mut ResponseWriter<W>) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let data = generate_data(1024 * 1024);
    let mut trailers = Headers::new();
    trailers.set("X-Content-SHA256", &hex(&Sha256::digest(&data)))?;
    trailers.set("X-Content-Length", &data.len().to_string())?;

    let mut headers = chunked_headers()?;
    headers.set(TRAILER, &trailers.trailer_field_value())?;
    writer.write(Some(&StatusCode::OK), Some(&headers), b"").await?;

    for chunk in data.chunks(CHUNK_SIZE) {
        writer.write_chunked_body(chunk).await?;
    }
    writer.write_trailers(&trailers).await?;
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
