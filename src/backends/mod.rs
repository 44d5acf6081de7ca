//! Injected capabilities the probes inspect.
//!
//! # Data Flow
//! ```text
//! HealthConfig (at startup)
//!     → Backends::from_config
//!         database  → sql.rs    (sea-orm, connection opened per check)
//!         cache     → memory.rs | redis_store.rs
//!         redis     → redis_store.rs (INFO)
//!         storage   → local.rs  | memory.rs
//!         log sink  → local.rs  (append-only file)
//!     → ProbeRegistry::standard(&backends)
//! ```
//!
//! # Design Decisions
//! - Probes depend on traits, never on concrete clients
//! - An unconfigured backend is `None`; its probe reports DOWN with an explanation
//! - Adapters bound every network wait with a timeout

pub mod local;
pub mod memory;
pub mod redis_store;
pub mod sql;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{CacheDriver, HealthConfig, StorageDisk};

pub use local::{FileLogSink, LocalStorage};
pub use memory::{MemoryCache, MemoryStorage};
pub use redis_store::RedisStore;
pub use sql::SqlDatabase;

/// Errors raised by backend adapters.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Invalid(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Summary of the primary database connection.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseInfo {
    pub name: String,
    pub driver: String,
    pub total_tables: u64,
}

#[async_trait]
pub trait Database: Send + Sync {
    /// Connect and count the tables of `schema`.
    async fn inspect(&self, schema: &str) -> BackendResult<DatabaseInfo>;

    /// Count rows of `table`. The name has already been validated.
    async fn count_rows(&self, table: &str) -> BackendResult<u64>;
}

/// get/put/delete with expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    fn driver(&self) -> &str;

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> BackendResult<()>;

    async fn get(&self, key: &str) -> BackendResult<Option<String>>;

    async fn delete(&self, key: &str) -> BackendResult<()>;
}

/// A key-value server able to describe itself.
#[async_trait]
pub trait KeyValueServer: Send + Sync {
    /// Server INFO fields (`redis_version`, `used_memory_human`, ...).
    async fn info(&self) -> BackendResult<HashMap<String, String>>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    fn disk(&self) -> &str;

    fn root(&self) -> String;

    async fn put(&self, path: &str, contents: &[u8]) -> BackendResult<()>;

    async fn exists(&self, path: &str) -> BackendResult<bool>;

    async fn delete(&self, path: &str) -> BackendResult<()>;
}

/// Destination for the logging probe's test line.
#[async_trait]
pub trait LogSink: Send + Sync {
    fn location(&self) -> String;

    async fn write_line(&self, line: &str) -> BackendResult<()>;
}

/// Answers whether a runtime capability is present on the host.
///
/// Lookups may block on the filesystem; callers run them off the async
/// executor.
pub trait CapabilitySource: Send + Sync {
    fn is_available(&self, name: &str) -> bool;
}

/// Looks capabilities up as executables on `PATH`.
#[derive(Debug, Default, Clone)]
pub struct PathExecutables;

impl CapabilitySource for PathExecutables {
    fn is_available(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }
}

/// Every backend the standard probes need. Absent entries leave their probe
/// reporting DOWN.
#[derive(Clone, Default)]
pub struct Backends {
    pub database: Option<Arc<dyn Database>>,
    pub cache: Option<Arc<dyn CacheStore>>,
    pub redis: Option<Arc<dyn KeyValueServer>>,
    pub storage: Option<Arc<dyn ObjectStorage>>,
    pub log_sink: Option<Arc<dyn LogSink>>,
    pub capabilities: Option<Arc<dyn CapabilitySource>>,
}

impl Backends {
    /// Wire adapters from configuration. Construction does not contact any
    /// service; invalid settings leave the backend unset and are logged.
    pub fn from_config(config: &HealthConfig) -> Self {
        let database = config.database.url.as_deref().map(|url| {
            let timeout = Duration::from_secs(config.database.connect_timeout_secs);
            Arc::new(SqlDatabase::new(url, timeout)) as Arc<dyn Database>
        });

        let redis = config
            .redis
            .url
            .as_deref()
            .and_then(|url| match RedisStore::open(url) {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    tracing::error!(error = %e, "Invalid Redis URL, redis backend disabled");
                    None
                }
            });

        let cache: Option<Arc<dyn CacheStore>> = match config.cache.driver {
            CacheDriver::Memory => Some(Arc::new(MemoryCache::new())),
            CacheDriver::Redis => redis.clone().map(|store| store as Arc<dyn CacheStore>),
        };

        let storage: Arc<dyn ObjectStorage> = match config.storage.disk {
            StorageDisk::Local => Arc::new(LocalStorage::new(&config.storage.root)),
            StorageDisk::Memory => Arc::new(MemoryStorage::new()),
        };

        Self {
            database,
            cache,
            redis: redis.map(|store| store as Arc<dyn KeyValueServer>),
            storage: Some(storage),
            log_sink: Some(Arc::new(FileLogSink::new(&config.logging.health_log_path))),
            capabilities: Some(Arc::new(PathExecutables)),
        }
    }

    /// True when `new` differs from `old` in a setting `from_config` reads.
    /// Such changes only take effect after a restart.
    pub fn wiring_changed(old: &HealthConfig, new: &HealthConfig) -> bool {
        old.database.url != new.database.url
            || old.database.connect_timeout_secs != new.database.connect_timeout_secs
            || old.redis != new.redis
            || old.cache.driver != new.cache.driver
            || old.storage != new.storage
            || old.logging.health_log_path != new.logging.health_log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wiring() {
        let backends = Backends::from_config(&HealthConfig::default());
        assert!(backends.database.is_none());
        assert!(backends.redis.is_none());
        assert_eq!(backends.cache.as_ref().map(|c| c.driver()), Some("memory"));
        assert_eq!(backends.storage.as_ref().map(|s| s.disk()), Some("local"));
        assert!(backends.log_sink.is_some());
    }

    #[test]
    fn test_redis_cache_without_url_is_unset() {
        let mut config = HealthConfig::default();
        config.cache.driver = CacheDriver::Redis;
        let backends = Backends::from_config(&config);
        assert!(backends.cache.is_none());
    }

    #[test]
    fn test_missing_executable() {
        assert!(!PathExecutables.is_available("definitely-not-a-real-binary-4f1c"));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_is_found_on_path() {
        assert!(PathExecutables.is_available("sh"));
    }

    #[test]
    fn test_wiring_changes_are_detected() {
        let old = HealthConfig::default();

        let mut probe_params = old.clone();
        probe_params.disk.threshold_percent = 75.0;
        probe_params.checks.redis = true;
        assert!(!Backends::wiring_changed(&old, &probe_params));

        let mut database = old.clone();
        database.database.url = Some("sqlite://app.db".into());
        assert!(Backends::wiring_changed(&old, &database));

        let mut log_path = old.clone();
        log_path.logging.health_log_path = "/var/log/health.log".into();
        assert!(Backends::wiring_changed(&old, &log_path));

        let mut storage = old.clone();
        storage.storage.disk = StorageDisk::Memory;
        assert!(Backends::wiring_changed(&old, &storage));
    }
}
