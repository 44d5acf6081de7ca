//! Object storage probe.

use std::sync::Arc;

use async_trait::async_trait;

use super::{unique_artifact_name, Probe, ProbeFault, ProbeName, ProbeResult, ProbeStatus};
use crate::backends::{BackendError, ObjectStorage};
use crate::config::HealthConfig;

const CONTENTS: &[u8] = b"Storage health check";

/// Writes a transient object, checks it exists, deletes it.
///
/// A failed delete is logged but does not change the status.
pub struct StorageProbe {
    storage: Option<Arc<dyn ObjectStorage>>,
}

impl StorageProbe {
    pub fn new(storage: Option<Arc<dyn ObjectStorage>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Probe for StorageProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Storage
    }

    async fn check(&self, _config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let storage = self
            .storage
            .as_ref()
            .ok_or(BackendError::NotConfigured("object storage"))?;

        let path = unique_artifact_name(".txt");
        // A failed write may still have created the object.
        let exists = match storage.put(&path, CONTENTS).await {
            Ok(()) => storage.exists(&path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = storage.delete(&path).await {
            tracing::warn!(path = %path, error = %e, "Failed to remove storage probe object");
        }
        let exists = exists?;

        Ok(ProbeResult::new(ProbeStatus::from_bool(exists))
            .with("default_disk", storage.disk())
            .with("root_path", storage.root()))
    }
}
