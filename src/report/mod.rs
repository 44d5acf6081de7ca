//! Report presentation.
//!
//! # Data Flow
//! ```text
//! HealthReport (orchestrator)
//!     → formatter::to_machine_readable → JSON value (HTTP body, CLI --json)
//!     → formatter::to_human_readable   → display lines (CLI)
//! ```
//!
//! # Design Decisions
//! - Both renderings read status straight from the same `ProbeResult`,
//!   so they cannot disagree
//! - Pure functions; no I/O, no clock

pub mod formatter;

pub use formatter::{to_human_readable, to_machine_readable};
