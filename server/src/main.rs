//! HTTP API server for the clearmine engine. The engine itself is purely
//! synchronous; this binary owns the listener, the request decoding, and the
//! single lock that serializes all engine calls.

use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use clearmine_core::{BoardConfig, GameEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod proto;
mod routes;

#[derive(Debug, Parser)]
#[command(name = "clearmine-server", about = "Minesweeper rules engine over HTTP")]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    bind: IpAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let engine = GameEngine::new(BoardConfig::default())?;
    let app = routes::router(Arc::new(Mutex::new(engine)));

    let listener = tokio::net::TcpListener::bind((cli.bind, cli.port)).await?;
    info!("clearmine server listening on http://{}:{}", cli.bind, cli.port);
    axum::serve(listener, app).await?;

    Ok(())
}
