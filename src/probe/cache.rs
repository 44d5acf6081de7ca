//! Cache round-trip probe.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{unique_artifact_name, Probe, ProbeFault, ProbeName, ProbeResult, ProbeStatus};
use crate::backends::{BackendError, CacheStore};
use crate::config::HealthConfig;

const TEST_VALUE: &str = "test";

/// Writes a transient key, reads it back and deletes it.
///
/// UP iff the value read equals the value written. The key is deleted even
/// when the read fails.
pub struct CacheProbe {
    store: Option<Arc<dyn CacheStore>>,
}

impl CacheProbe {
    pub fn new(store: Option<Arc<dyn CacheStore>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Probe for CacheProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Cache
    }

    async fn check(&self, config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let store = self
            .store
            .as_ref()
            .ok_or(BackendError::NotConfigured("cache store"))?;

        let key = unique_artifact_name("");
        let ttl = Duration::from_secs(config.cache.ttl_secs.max(1));

        store.put(&key, TEST_VALUE, ttl).await?;
        let read = store.get(&key).await;
        if let Err(e) = store.delete(&key).await {
            tracing::warn!(key = %key, error = %e, "Failed to remove cache probe key");
        }
        let value = read?;

        let matches = value.as_deref() == Some(TEST_VALUE);
        if !matches {
            tracing::warn!(key = %key, read = ?value, "Cache returned a different value");
        }

        Ok(ProbeResult::new(ProbeStatus::from_bool(matches)).with("driver", store.driver()))
    }
}
