//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator, probes, HTTP layer produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (probe gauges, durations, run counters)
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so CLI stdout carries only the report
//! - Metric updates are no-ops until an exporter is installed
//! - `RUST_LOG` overrides the configured level

pub mod logging;
pub mod metrics;
