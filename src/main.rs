//! Ethereum Explorer API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Frontend                 ┌──────────────────────────────────────────────┐
//!     ────────────────────────▶│ http::server (request id, trace, cors)       │
//!                              │      │                                       │
//!                              │      ▼                                       │
//!                              │ http::handlers ──▶ explorer::query (400)     │
//!                              │      │                                       │
//!                              │      ▼                                       │
//!                              │ explorer::{wallet, transaction}              │
//!                              │      │ sequential calls                      │
//!                              │      ▼                                       │
//!                              │ upstream::client ──▶ upstream::pacing        │──▶ Upstream API
//!                              └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use eth_explorer::config::load_config;
use eth_explorer::http::HttpServer;
use eth_explorer::lifecycle::{signals, Shutdown};
use eth_explorer::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "eth-explorer")]
#[command(about = "HTTP API for Ethereum wallet and transaction lookups", long_about = None)]
struct Cli {
    /// Optional TOML config file.
    #[arg(short, long, env = "EXPLORER_CONFIG")]
    config: Option<PathBuf>,

    /// Listening port (overrides PORT and the config file).
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("eth-explorer v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.bind_address(),
        upstream = ?config.upstream,
        tokens = config.tokens.len(),
        cors = ?config.cors.allowed_origins,
        "Configuration loaded"
    );
    if config.tokens.is_empty() {
        tracing::warn!("No tokens configured, wallet lookups will report no token balances");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
