//! Static mapping from probe name to implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::backends::Backends;
use crate::probe::{
    CacheProbe, DatabaseProbe, DiskSpaceProbe, EnvConfigProbe, LoggingProbe, LokiProbe,
    MailProbe, MigrationsProbe, Probe, ProbeName, QueueProbe, RedisProbe,
    RuntimeCapabilitiesProbe, StorageProbe,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no probe registered under '{0}'")]
    UnknownProbe(ProbeName),

    #[error("a probe named '{0}' is already registered")]
    DuplicateProbe(ProbeName),
}

/// Probes keyed by name. Built once at startup, independent of which probes
/// are enabled.
#[derive(Default, Clone)]
pub struct ProbeRegistry {
    probes: BTreeMap<ProbeName, Arc<dyn Probe>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every standard probe, wired to `backends`.
    pub fn standard(backends: &Backends) -> Self {
        let probes: Vec<Arc<dyn Probe>> = vec![
            Arc::new(EnvConfigProbe),
            Arc::new(DatabaseProbe::new(backends.database.clone())),
            Arc::new(RedisProbe::new(backends.redis.clone())),
            Arc::new(CacheProbe::new(backends.cache.clone())),
            Arc::new(StorageProbe::new(backends.storage.clone())),
            Arc::new(QueueProbe),
            Arc::new(MailProbe),
            Arc::new(DiskSpaceProbe),
            Arc::new(MigrationsProbe::new(backends.database.clone())),
            Arc::new(RuntimeCapabilitiesProbe::new(backends.capabilities.clone())),
            Arc::new(LokiProbe::new()),
            Arc::new(LoggingProbe::new(backends.log_sink.clone())),
        ];

        let mut registry = Self::new();
        for probe in probes {
            if let Err(e) = registry.register(probe) {
                tracing::error!(error = %e, "Skipping probe registration");
            }
        }
        registry
    }

    pub fn register(&mut self, probe: Arc<dyn Probe>) -> Result<(), RegistryError> {
        let name = probe.name();
        if self.probes.contains_key(&name) {
            return Err(RegistryError::DuplicateProbe(name));
        }
        self.probes.insert(name, probe);
        Ok(())
    }

    pub fn resolve(&self, name: ProbeName) -> Result<Arc<dyn Probe>, RegistryError> {
        self.probes
            .get(&name)
            .cloned()
            .ok_or(RegistryError::UnknownProbe(name))
    }

    /// Registered names in declaration order.
    pub fn names(&self) -> Vec<ProbeName> {
        self.probes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}
