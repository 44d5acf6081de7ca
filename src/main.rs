//! Health orchestrator HTTP server.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────────────┐
//!                  │                  HEALTH ORCHESTRATOR                  │
//!                  │                                                       │
//!   GET /health    │  ┌─────────┐    ┌──────────────┐    ┌──────────────┐  │
//!   ───────────────┼─▶│  http   │───▶│ orchestrator │───▶│   registry   │  │
//!                  │  │ server  │    │  + selector  │    │   (probes)   │  │
//!                  │  └────▲────┘    └──────┬───────┘    └──────┬───────┘  │
//!                  │       │                │                   │          │
//!                  │  ┌────┴────┐    ┌──────▼───────┐    ┌──────▼───────┐  │
//!   200 / 500 JSON │  │ report  │◀───│ HealthReport │    │   backends   │──┼──▶ DB, Redis,
//!   ◀──────────────┼──│formatter│    └──────────────┘    └──────────────┘  │    Loki, disk
//!                  │  └─────────┘                                          │
//!                  │  ┌─────────────────────────────────────────────────┐  │
//!                  │  │ config (TOML + env + watcher) │ observability  │  │
//!                  │  │ lifecycle (startup/shutdown)  │ logs + metrics │  │
//!                  │  └─────────────────────────────────────────────────┘  │
//!                  └───────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use health_orchestrator::config::{load_or_default, ConfigWatcher};
use health_orchestrator::http::HttpServer;
use health_orchestrator::lifecycle::{build_orchestrator, wait_for_signal, Shutdown};
use health_orchestrator::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "health-orchestrator")]
#[command(about = "Serve the aggregated health report over HTTP", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, env = "HEALTHCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Reload the configuration file when it changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init(&config.logging)?;
    tracing::info!("health-orchestrator v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        path = %config.server.path,
        probe_timeout_ms = config.orchestrator.probe_timeout_ms,
        "Configuration loaded"
    );

    if config.metrics.enabled {
        match config.metrics.address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.metrics.address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (Some(watcher.run()?), rx)
        }
        _ => {
            let (_, rx) = mpsc::unbounded_channel();
            (None, rx)
        }
    };

    let orchestrator = Arc::new(build_orchestrator(config));
    let server = HttpServer::new(orchestrator);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
