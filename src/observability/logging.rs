//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Pick pretty or JSON output from configuration
//! - Honour `RUST_LOG` when set
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - Probe log lines use the `health_check` target so they can be filtered

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Directive used when `RUST_LOG` is absent.
pub fn default_directive(config: &LoggingConfig) -> String {
    format!(
        "health_orchestrator={level},health_check={level},tower_http={level}",
        level = config.level
    )
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let (pretty, json) = match config.format {
        LogFormat::Pretty => (Some(fmt::layer().with_writer(std::io::stderr)), None),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()
}
