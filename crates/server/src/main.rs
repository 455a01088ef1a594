// crates/server/src/main.rs
//! jobwatch server binary.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jobwatch_server::{create_app, AppState, CollectorSettings};

/// Reference backend for the jobwatch progress-polling contract.
#[derive(Debug, Parser)]
#[command(name = "jobwatch-server", version)]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 48620)]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Require this bearer token on every request.
    #[arg(long)]
    token: Option<String>,

    /// Simulated work time per collected item, in milliseconds.
    #[arg(long, default_value_t = 500)]
    item_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let state = AppState::new(
        CollectorSettings {
            item_delay: Duration::from_millis(args.item_delay_ms),
        },
        args.token,
    );
    let app = create_app(state);

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "jobwatch server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
