//! Probes: one self-contained health assessment per dependency.
//!
//! # Data Flow
//! ```text
//! Orchestrator
//!     → Probe::check(&HealthConfig snapshot)
//!     → injected backend (Database, CacheStore, ObjectStorage, ...)
//!     → Ok(ProbeResult)      deliberate UP/DOWN (threshold violations included)
//!     → Err(ProbeFault)      dependency unreachable or misconfigured
//!     → Orchestrator turns faults into DOWN results with `error` set
//! ```
//!
//! # Design Decisions
//! - Probes never decide failure isolation; they only return `Result`
//! - Transient artifacts (cache keys, storage objects) carry a UUID so
//!   concurrent runs never collide, and are removed on every path
//! - Probe detail is an open JSON map, flattened into the report

pub mod capabilities;
pub mod cache;
pub mod database;
pub mod disk;
pub mod env_config;
pub mod logging;
pub mod loki;
pub mod mail;
pub mod migrations;
pub mod queue;
pub mod redis;
pub mod storage;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::backends::BackendError;
use crate::config::HealthConfig;

pub use capabilities::RuntimeCapabilitiesProbe;
pub use cache::CacheProbe;
pub use database::DatabaseProbe;
pub use disk::{format_bytes, DiskSpaceProbe};
pub use env_config::EnvConfigProbe;
pub use logging::LoggingProbe;
pub use loki::LokiProbe;
pub use mail::{MailProbe, MailTransport};
pub use migrations::MigrationsProbe;
pub use queue::QueueProbe;
pub use redis::RedisProbe;
pub use storage::StorageProbe;

/// Probe-specific detail: scalars or nested maps keyed by string.
pub type Detail = Map<String, Value>;

/// Identifier of a registered probe.
///
/// Declaration order is the order probes are selected, run and reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProbeName {
    EnvConfig,
    Database,
    Redis,
    Cache,
    Storage,
    Queue,
    Mail,
    DiskSpace,
    Migrations,
    RuntimeCapabilities,
    Loki,
    Logging,
}

impl ProbeName {
    pub const ALL: [ProbeName; 12] = [
        ProbeName::EnvConfig,
        ProbeName::Database,
        ProbeName::Redis,
        ProbeName::Cache,
        ProbeName::Storage,
        ProbeName::Queue,
        ProbeName::Mail,
        ProbeName::DiskSpace,
        ProbeName::Migrations,
        ProbeName::RuntimeCapabilities,
        ProbeName::Loki,
        ProbeName::Logging,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProbeName::EnvConfig => "env-config",
            ProbeName::Database => "database",
            ProbeName::Redis => "redis",
            ProbeName::Cache => "cache",
            ProbeName::Storage => "storage",
            ProbeName::Queue => "queue",
            ProbeName::Mail => "mail",
            ProbeName::DiskSpace => "disk-space",
            ProbeName::Migrations => "migrations",
            ProbeName::RuntimeCapabilities => "runtime-capabilities",
            ProbeName::Loki => "loki",
            ProbeName::Logging => "logging",
        }
    }

    /// Environment variable toggling this probe, e.g. `HEALTHCHECK_DISK_SPACE`.
    pub fn env_key(self) -> String {
        format!(
            "HEALTHCHECK_{}",
            self.as_str().replace('-', "_").to_ascii_uppercase()
        )
    }
}

impl fmt::Display for ProbeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown probe name '{0}'")]
pub struct UnknownProbeName(pub String);

impl FromStr for ProbeName {
    type Err = UnknownProbeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "php-extensions" {
            return Ok(ProbeName::RuntimeCapabilities);
        }
        ProbeName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownProbeName(s.to_string()))
    }
}

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Up,
    Down,
}

impl ProbeStatus {
    pub fn from_bool(up: bool) -> Self {
        if up {
            ProbeStatus::Up
        } else {
            ProbeStatus::Down
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProbeStatus::Up => "UP",
            ProbeStatus::Down => "DOWN",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one probe execution.
///
/// `error` is a diagnostic aid set when the probe faulted; a deliberate DOWN
/// (threshold exceeded, debug mode on) leaves it empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    pub detail: Detail,
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn new(status: ProbeStatus) -> Self {
        Self {
            status,
            detail: Detail::new(),
            error: None,
        }
    }

    pub fn up() -> Self {
        Self::new(ProbeStatus::Up)
    }

    pub fn down() -> Self {
        Self::new(ProbeStatus::Down)
    }

    /// A DOWN result carrying a fault message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::down().with_error(message)
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.detail.insert(key.to_string(), value.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn is_up(&self) -> bool {
        self.status == ProbeStatus::Up
    }
}

impl From<ProbeFault> for ProbeResult {
    fn from(fault: ProbeFault) -> Self {
        Self {
            status: ProbeStatus::Down,
            detail: fault.detail,
            error: Some(fault.message),
        }
    }
}

/// A dependency was unreachable, misbehaved, or is not configured.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ProbeFault {
    message: String,
    detail: Detail,
}

impl ProbeFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: Detail::new(),
        }
    }

    /// Detail reported alongside the error (e.g. the table that failed).
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.detail.insert(key.to_string(), value.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<BackendError> for ProbeFault {
    fn from(e: BackendError) -> Self {
        ProbeFault::new(e.to_string())
    }
}

/// A self-contained health assessment of one dependency.
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> ProbeName;

    /// Inspect the dependency. Faults are expected when it is unreachable.
    async fn check(&self, config: &HealthConfig) -> Result<ProbeResult, ProbeFault>;

    /// Upper bound the orchestrator enforces on `check`.
    fn timeout(&self, config: &HealthConfig) -> Duration {
        config.orchestrator.probe_timeout()
    }
}

/// Name for a transient probe artifact, unique across concurrent runs.
pub(crate) fn unique_artifact_name(suffix: &str) -> String {
    format!("health_check_{}{}", uuid::Uuid::new_v4().simple(), suffix)
}
