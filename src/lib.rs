//! Pluggable health-check orchestrator.
//!
//! Probes assess one dependency each; the orchestrator runs the enabled ones
//! concurrently, isolates their failures and aggregates a single report that
//! the HTTP endpoint and the CLI render.

pub mod backends;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orchestrator;
pub mod probe;
pub mod report;

pub use config::schema::HealthConfig;
pub use http::HttpServer;
pub use lifecycle::{build_orchestrator, Shutdown};
pub use orchestrator::{HealthReport, Orchestrator, OverallStatus, ProbeRegistry};
pub use probe::{Probe, ProbeFault, ProbeName, ProbeResult, ProbeStatus};
