//! Event REST interface (v1)
//!
//! Publishes the actions of an event registry over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                   REST INTERFACE                      │
//!                    │                                                       │
//!   Client Request   │  ┌───────────┐   ┌──────┐   ┌─────────┐   ┌────────┐  │
//!   ─────────────────┼─▶│ correlate │──▶│ CORS │──▶│  body   │──▶│ router │  │
//!                    │  │ (req id)  │   │      │   │ decode  │   └───┬────┘  │
//!                    │  └───────────┘   └──────┘   └─────────┘       │       │
//!                    │                                  ┌────────────┴────┐  │
//!                    │                                  ▼                 ▼  │
//!                    │                           ┌───────────┐    ┌─────────┐│
//!                    │                           │  /health  │    │ actions ││──▶ event
//!                    │                           └───────────┘    └─────────┘│    processor
//!   Client Response  │  ┌──────────────────────────────┐               │     │
//!   ◀────────────────┼──│ envelopes / error normalizer │◀──────────────┘     │
//!                    │  └──────────────────────────────┘                     │
//!                    └──────────────────────────────────────────────────────┘
//! ```

mod demo;

use std::path::PathBuf;

use clap::Parser;

use event_rest::config::{load_config, ServiceConfig};
use event_rest::observability::{logging, metrics};
use event_rest::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "event-rest")]
#[command(about = "Expose event registry actions over HTTP", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overriding `rest.port`.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(port) = args.port {
        config.rest.port = port;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!(
        bind_address = %config.rest.bind_address(),
        max_body_bytes = config.rest.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::info!("rest interface starting");
    let registry = demo::registry()?;
    let server = HttpServer::new(config, &registry, demo::process_event)?;
    let listener = server.bind().await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
