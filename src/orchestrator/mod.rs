//! Probe orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! HealthConfig snapshot (ArcSwap)
//!     → selector.rs (enabled names, declaration order)
//!     → registry.rs (name → Arc<dyn Probe>, unknown names skipped)
//!     → runner.rs   (one task per probe, timeout, panic capture)
//!     → report.rs   (Checks in run order, overall status, timestamp)
//!     → report formatter / HTTP handler / CLI
//! ```
//!
//! # Design Decisions
//! - A probe that faults, panics or hangs only produces its own DOWN entry
//! - Overall status is healthy iff at least one probe ran and all are UP
//! - The registry is fixed at startup; only configuration is hot-swapped
//! - Dropping an in-flight run aborts the probes it spawned

pub mod registry;
pub mod report;
pub mod runner;
pub mod selector;

pub use registry::{ProbeRegistry, RegistryError};
pub use report::{Checks, HealthReport, OverallStatus};
pub use runner::Orchestrator;
pub use selector::select_enabled;
