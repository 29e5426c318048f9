//! Sink configuration hot reload service.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌────────────────────┐   change    ┌──────────────────┐   validated map   ┌────────────────┐
//!   │  property source   │ ──────────▶ │ reload pipeline  │ ────────────────▶ │  sink manager  │
//!   │ (memory | file)    │  raw text   │ decode/validate  │ initial_set / set │ (active sinks) │
//!   └────────────────────┘             └──────────────────┘                   └────────────────┘
//!             ▲                                  │
//!             │ initial read                     ▼
//!   ┌────────────────────┐             ┌──────────────────┐
//!   │ sink configurator  │             │ logs + metrics   │
//!   └────────────────────┘             └──────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use sink_configurator::config::resolve_config;
use sink_configurator::lifecycle;
use sink_configurator::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "sink-configurator")]
#[command(about = "Hot reload bridge for sink routing configuration", long_about = None)]
struct Cli {
    /// Bootstrap configuration file (TOML); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override observability.log_level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), cli.log_level)?;

    logging::init_logging(&config.observability);

    tracing::info!(
        config_file = ?cli.config,
        key = %config.property.key,
        source = ?config.property.source,
        "sink-configurator v{} starting",
        env!("CARGO_PKG_VERSION")
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

    let running = lifecycle::start(&config)?;
    tracing::info!(
        initial = ?running.configurator.initial_outcome(),
        active = ?running.sinks.sink_names(),
        "Sink configurator running"
    );

    lifecycle::wait_for_shutdown().await;

    tracing::info!(active = ?running.sinks.sink_names(), "Shutdown complete");
    Ok(())
}
