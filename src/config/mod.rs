//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (HEALTHCHECK_<NAME>, LOKI_URL, ...)
//!     → validation.rs (semantic checks)
//!     → HealthConfig (validated, immutable)
//!     → swapped into the Orchestrator, snapshotted once per run
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → mpsc channel → Orchestrator::update_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Check flags use one flat table; unknown probe names are rejected at parse time

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AppConfig, CacheConfig, CacheDriver, CapabilitiesConfig, ChecksConfig, DatabaseConfig,
    DiskConfig, HealthConfig, LogFormat, LoggingConfig, LokiConfig, MailConfig, MetricsConfig,
    OrchestratorConfig, QueueConfig, RedisConfig, ServerConfig, StorageConfig, StorageDisk,
};
pub use watcher::ConfigWatcher;
