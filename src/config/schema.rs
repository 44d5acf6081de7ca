//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the health
//! orchestrator. All types derive Serde traits for deserialization from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::probe::ProbeName;

/// Root configuration for the health orchestrator.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct HealthConfig {
    /// HTTP endpoint settings.
    pub server: ServerConfig,

    /// Probe execution limits.
    pub orchestrator: OrchestratorConfig,

    /// Enabled flag per probe.
    pub checks: ChecksConfig,

    /// Application environment (debug flag, timezone).
    pub app: AppConfig,

    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub redis: RedisConfig,
    pub storage: StorageConfig,
    pub queue: QueueConfig,
    pub mail: MailConfig,
    pub disk: DiskConfig,
    pub loki: LokiConfig,
    pub logging: LoggingConfig,
    pub capabilities: CapabilitiesConfig,
    pub metrics: MetricsConfig,
}

/// HTTP endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Route serving the health report.
    pub path: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            path: "/health".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Probe execution limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Upper bound for a single probe in milliseconds.
    pub probe_timeout_ms: u64,

    /// Overall deadline for one run in milliseconds. Caps every probe timeout.
    pub deadline_ms: Option<u64>,
}

impl OrchestratorConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 5_000,
            deadline_ms: Some(10_000),
        }
    }
}

/// Enabled flags, one per probe.
///
/// Core checks cover the application itself, infrastructure checks cover
/// external services and system resources. The grouping is organisational only.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ChecksConfig {
    // Core
    pub database: bool,
    pub cache: bool,
    pub queue: bool,
    pub mail: bool,
    pub migrations: bool,
    pub env_config: bool,

    // Infrastructure
    pub redis: bool,
    pub storage: bool,
    pub disk_space: bool,
    pub logging: bool,
    pub loki: bool,
    #[serde(alias = "php-extensions")]
    pub runtime_capabilities: bool,
}

impl ChecksConfig {
    /// Every flag set to `value`.
    pub fn all(value: bool) -> Self {
        let mut checks = Self::default();
        for name in ProbeName::ALL {
            checks.set(name, value);
        }
        checks
    }

    pub fn is_enabled(&self, name: ProbeName) -> bool {
        match name {
            ProbeName::EnvConfig => self.env_config,
            ProbeName::Database => self.database,
            ProbeName::Redis => self.redis,
            ProbeName::Cache => self.cache,
            ProbeName::Storage => self.storage,
            ProbeName::Queue => self.queue,
            ProbeName::Mail => self.mail,
            ProbeName::DiskSpace => self.disk_space,
            ProbeName::Migrations => self.migrations,
            ProbeName::RuntimeCapabilities => self.runtime_capabilities,
            ProbeName::Loki => self.loki,
            ProbeName::Logging => self.logging,
        }
    }

    pub fn set(&mut self, name: ProbeName, enabled: bool) {
        let flag = match name {
            ProbeName::EnvConfig => &mut self.env_config,
            ProbeName::Database => &mut self.database,
            ProbeName::Redis => &mut self.redis,
            ProbeName::Cache => &mut self.cache,
            ProbeName::Storage => &mut self.storage,
            ProbeName::Queue => &mut self.queue,
            ProbeName::Mail => &mut self.mail,
            ProbeName::DiskSpace => &mut self.disk_space,
            ProbeName::Migrations => &mut self.migrations,
            ProbeName::RuntimeCapabilities => &mut self.runtime_capabilities,
            ProbeName::Loki => &mut self.loki,
            ProbeName::Logging => &mut self.logging,
        };
        *flag = enabled;
    }
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            database: true,
            cache: true,
            queue: true,
            mail: false,
            migrations: true,
            env_config: true,
            redis: false,
            storage: true,
            disk_space: true,
            logging: true,
            loki: false,
            runtime_capabilities: false,
        }
    }
}

/// Application environment.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Debug mode. Reported as a health failure by the env-config probe.
    pub debug: bool,

    /// Configured timezone identifier.
    pub timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            timezone: "UTC".to_string(),
        }
    }
}

/// Primary database connection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL (postgres:// or sqlite://). None leaves the probe unwired.
    pub url: Option<String>,

    /// Schema whose tables are counted.
    pub schema: String,

    /// Migration-tracking table.
    pub migrations_table: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            schema: "public".to_string(),
            migrations_table: "migrations".to_string(),
            connect_timeout_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheDriver {
    #[default]
    Memory,
    Redis,
}

/// Cache store used by the cache probe.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub driver: CacheDriver,

    /// Expiry of the transient test key in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            driver: CacheDriver::Memory,
            ttl_secs: 60,
        }
    }
}

/// Key-value server connection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct RedisConfig {
    /// Connection URL (e.g., "redis://127.0.0.1:6379").
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageDisk {
    #[default]
    Local,
    Memory,
}

/// Object storage used by the storage probe.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub disk: StorageDisk,

    /// Root directory for the local disk.
    pub root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            disk: StorageDisk::Local,
            root: "storage/app".to_string(),
        }
    }
}

/// Queue backend selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct QueueConfig {
    /// Default queue connection name.
    pub default: Option<String>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            default: Some("sync".to_string()),
        }
    }
}

/// Mail transport settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MailConfig {
    /// Mailer kind: smtp, sendmail, log or array.
    pub mailer: String,

    /// Transport URL (smtp://host:port or smtps://host:port) for smtp,
    /// binary path for sendmail.
    pub url: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            mailer: "smtp".to_string(),
            url: None,
        }
    }
}

/// Disk capacity settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DiskConfig {
    /// Filesystem path whose volume is measured.
    pub path: String,

    /// Used percentage above which the probe reports DOWN.
    pub threshold_percent: f64,

    /// Decimal places for formatted byte sizes.
    pub precision: usize,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            threshold_percent: 90.0,
            precision: 2,
        }
    }
}

/// Log aggregation backend.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LokiConfig {
    /// Base URL (e.g., "http://loki:3100").
    pub url: Option<String>,

    /// Client timeout in seconds.
    pub timeout_secs: u64,
}

impl LokiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LokiConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    pub format: LogFormat,

    /// File the logging probe appends its test line to.
    pub health_log_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            health_log_path: "storage/logs/health_check.log".to_string(),
        }
    }
}

/// Runtime capabilities the host must provide.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct CapabilitiesConfig {
    /// Executable names looked up on PATH.
    pub required: Vec<String>,
}

/// Metrics exporter.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable the Prometheus endpoint.
    pub enabled: bool,

    /// Metrics endpoint bind address.
    pub address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "0.0.0.0:9090".to_string(),
        }
    }
}
