//! HTTP サーバー
//!
//! 1 つの TCP ポートで待ち受け、接続ごとに tokio タスクを起動する。
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_http11_wire::{Server, shutdown_signal};
//!
//! let server = Server::bind("0.0.0.0:3030").await?
//!     .read_timeout(Duration::from_secs(10));
//! server.serve_with_shutdown(handler, shutdown_signal()).await?;
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http11_wire::DecoderLimits;
use tokio::net::TcpListener;

use crate::connection::serve_connection;
use crate::error::Result;
use crate::handler::Handler;

/// 1 回の read で要求する最大バイト数のデフォルト
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// 接続ごとの設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// パーサーの制限 (パースウィンドウの容量を含む)
    pub limits: DecoderLimits,
    /// 1 回の read のタイムアウト (デフォルト: なし)
    pub read_timeout: Option<Duration>,
    /// 1 回の書き込みのタイムアウト (デフォルト: なし)
    pub write_timeout: Option<Duration>,
    /// 1 回の read で要求する最大バイト数
    pub read_chunk_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            limits: DecoderLimits::default(),
            read_timeout: None,
            write_timeout: None,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

/// HTTP サーバー
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    /// 指定アドレスにバインド
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            config: ServerConfig::default(),
        })
    }

    /// パーサーの制限を設定
    pub fn limits(mut self, limits: DecoderLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// 読み取りタイムアウトを設定
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = Some(timeout);
        self
    }

    /// 書き込みタイムアウトを設定
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.config.write_timeout = Some(timeout);
        self
    }

    /// 1 回の read で要求する最大バイト数を設定 (最小 1)
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size.max(1);
        self
    }

    /// 接続ごとの設定を取得
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// ローカルアドレスを取得
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// サーバーを起動 (停止しない)
    pub async fn serve<H: Handler>(self, handler: H) -> Result<()> {
        self.serve_with_shutdown(handler, std::future::pending())
            .await
    }

    /// `shutdown` が完了するまでサーバーを起動
    ///
    /// 停止時は待ち受けソケットを閉じる。処理中の接続は終わるまで動き続ける。
    pub async fn serve_with_shutdown<H, F>(self, handler: H, shutdown: F) -> Result<()>
    where
        H: Handler,
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        let config = Arc::new(self.config);
        let handler = Arc::new(handler);
        tracing::info!(%addr, "listening");

        tokio::pin!(shutdown);
        loop {
            let (stream, peer_addr) = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(%addr, "shutting down");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                        continue;
                    }
                },
            };

            tracing::debug!(peer = %peer_addr, "accepted");
            let config = config.clone();
            let handler = handler.clone();
            tokio::spawn(async move {
                if let Err(e) = serve_connection(stream, &config, handler.as_ref()).await {
                    tracing::warn!(peer = %peer_addr, error = %e, "connection error");
                }
            });
        }

        Ok(())
    }

    /// 単一の接続を処理 (テスト用)
    pub async fn handle_one<H: Handler>(self, handler: H) -> Result<()> {
        let (stream, peer_addr) = self.listener.accept().await?;
        tracing::debug!(peer = %peer_addr, "accepted");
        serve_connection(stream, &self.config, &handler).await
    }
}

/// SIGINT または SIGTERM を待つ (unix 以外は Ctrl-C のみ)
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(terminate) => terminate,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                wait_ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = wait_ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    wait_ctrl_c().await;
}

async fn wait_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
