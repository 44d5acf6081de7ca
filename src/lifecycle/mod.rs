//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Wire backends → Register probes → Orchestrator
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGTERM → Shutdown::trigger → server stops accepting → exit
//! ```
//!
//! # Design Decisions
//! - Backends are wired once; configuration changes after startup only
//!   affect probe parameters, not which adapters exist
//! - Shutdown is a broadcast so any number of tasks can observe it

pub mod shutdown;
pub mod startup;

pub use shutdown::{wait_for_signal, Shutdown};
pub use startup::build_orchestrator;
