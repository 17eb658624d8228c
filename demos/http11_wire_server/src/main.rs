//! HTTP サーバーの例 (tokio + http11_wire)
//!
//! 使い方:
//!   cargo run -p http11_wire_server -- --port 3030
//!
//! 動作確認:
//!   curl -v http://localhost:3030/
//!   curl -v http://localhost:3030/not
//!   curl --raw http://localhost:3030/chunked
//!   curl --raw http://localhost:3030/chunked-trailer -o /dev/null -D - --trailer
//!
//! ログは `RUST_LOG` で調整する (デフォルト: info)。

mod routes;

use std::time::Duration;

use http11_wire::DecoderLimits;
use tokio_http11_wire::{Server, shutdown_signal};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::routes::Routes;

struct ServerOptions {
    port: u16,
    max_buffer_size: usize,
    read_timeout: Option<Duration>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = format!("0.0.0.0:{}", options.port);
    let limits = DecoderLimits {
        max_buffer_size: options.max_buffer_size,
        ..DecoderLimits::default()
    };
    let mut server = Server::bind(&addr).await?.limits(limits);
    if let Some(timeout) = options.read_timeout {
        server = server.read_timeout(timeout);
    }

    server.serve_with_shutdown(Routes, shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

fn parse_args() -> Result<ServerOptions, Box<dyn std::error::Error>> {
    let mut args = noargs::raw_args();
    args.metadata_mut().app_name = "http11_wire_server";

    // --help フラグ
    noargs::HELP_FLAG.take_help(&mut args);

    // --version フラグ
    let version_flag: bool = noargs::flag("version")
        .short('V')
        .doc("Show version")
        .take(&mut args)
        .is_present();
    if version_flag {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    // --port オプション
    let port: u16 = noargs::opt("port")
        .short('p')
        .doc("Port to listen on")
        .default("3030")
        .take(&mut args)
        .then(|o| o.value().parse())
        .map_err(|e| format!("{:?}", e))?;

    // --max-buffer-size オプション
    let max_buffer_size: usize = noargs::opt("max-buffer-size")
        .doc("Capacity of the per-connection parse window in bytes")
        .default("8192")
        .take(&mut args)
        .then(|o| o.value().parse())
        .map_err(|e| format!("{:?}", e))?;
    if max_buffer_size == 0 {
        return Err("--max-buffer-size must be greater than 0".into());
    }

    // --read-timeout-secs オプション
    let read_timeout: Option<Duration> = noargs::opt("read-timeout-secs")
        .doc("Per-read timeout in seconds (no timeout if omitted)")
        .take(&mut args)
        .present_and_then(|o| o.value().parse().map(Duration::from_secs))
        .map_err(|e| format!("{:?}", e))?;

    // 未知の引数があればエラー、ヘルプが返されたら表示
    if let Some(help) = args.finish().map_err(|e| format!("{:?}", e))? {
        print!("{}", help);
        std::process::exit(0);
    }

    Ok(ServerOptions {
        port,
        max_buffer_size,
        read_timeout,
    })
}
