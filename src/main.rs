//! Dependency health aggregator (healthcheck)
//!
//! Polls the downstream services this pod depends on and exposes a single
//! aggregated verdict on `GET /health` for the orchestrator's probes.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 HEALTHCHECK                  │
//!                      │                                              │
//!                      │  ┌───────────┐  tick   ┌──────────────────┐  │     GET
//!                      │  │ scheduler │────────▶│  HopefulProbe    │──┼───────────▶ Service
//!                      │  │ (1 task / │         │   LoggingProbe   │  │
//!                      │  │   probe)  │         │     HttpProbe    │  │
//!                      │  └───────────┘         └────────┬─────────┘  │
//!                      │                                 │ verdict    │
//!                      │                                 ▼            │
//!     GET /health      │  ┌───────────┐         ┌──────────────────┐  │
//!     ─────────────────┼─▶│  server   │────────▶│  HealthAggregate │  │
//!     200 / 500        │  │  (axum)   │         │ geo veto + AND   │  │
//!     ◀────────────────┼──│           │         └──────────────────┘  │
//!                      │  └───────────┘                               │
//!                      │                                              │
//!                      │   config · observability · lifecycle         │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use healthcheck::config::load_config;
use healthcheck::lifecycle::build_application;
use healthcheck::observability::init_logging;

#[derive(Parser)]
#[command(name = "healthcheck")]
#[command(about = "Aggregates downstream health into a single /health endpoint", long_about = None)]
struct Args {
    /// Configuration file (TOML). Defaults to ./config.toml, then /etc/healthcheck/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, overrides RUST_LOG and the configured level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging, args.log_level.as_deref())?;

    tracing::info!("healthcheck v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Configuration loaded:\n{}", config.as_json());

    let app = build_application(&config)?;
    let errors = app.run().await;

    if errors.is_empty() {
        tracing::info!("Shutdown complete");
    } else {
        tracing::warn!(errors = errors.len(), "Shutdown complete with errors");
    }
    Ok(())
}
