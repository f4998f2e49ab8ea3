//! Admission gate
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id → trace → timeout
//!                         │
//!                         ▼
//!                  ┌──────────────┐   429
//!                  │  rate limit  │ ──────▶
//!                  └──────┬───────┘
//!                         ▼
//!                  ┌──────────────┐   401 (invalid credential) / 500
//!                  │  principal   │ ──────▶
//!                  │  resolver    │
//!                  └──────┬───────┘
//!                         ▼
//!                  ┌──────────────┐   401 / 403 / 500
//!                  │ route guards │ ──────▶
//!                  └──────┬───────┘
//!                         ▼
//!                      handler
//!
//!     Background: registry sweeper evicts idle clients every sweep interval
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use admission_gate::auth::MemoryStore;
use admission_gate::config::{load_config, GateConfig};
use admission_gate::observability::{logging, metrics};
use admission_gate::{HttpServer, Shutdown, Stores};

#[derive(Parser)]
#[command(name = "admission-gate")]
#[command(about = "Rate limiting and bearer-token authorization in front of an HTTP API", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rate_limit_enabled = config.rate_limit.enabled,
        requests_per_second = config.rate_limit.requests_per_second,
        burst_size = config.rate_limit.burst_size,
        accounts = config.accounts.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let stores = Stores::memory(MemoryStore::from_accounts(&config.accounts));
    let server = HttpServer::new(config, stores)?;

    let shutdown = Shutdown::new();
    shutdown.listen_for_ctrl_c();

    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
