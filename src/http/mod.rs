//! HTTP surface for the health report.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request ID, trace, timeout)
//!     → health handler → Orchestrator::run
//!     → report::to_machine_readable
//!     → 200 healthy / 500 unhealthy
//! ```

pub mod server;

pub use server::{AppState, HttpServer, X_REQUEST_ID};
