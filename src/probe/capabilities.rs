//! Required runtime capabilities.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Probe, ProbeFault, ProbeName, ProbeResult, ProbeStatus};
use crate::backends::{BackendError, CapabilitySource};
use crate::config::HealthConfig;

/// Reports a flat presence map, one boolean per required capability.
///
/// The map alone carries no status, so the probe is wrapped to be UP iff
/// every capability is present.
pub struct RuntimeCapabilitiesProbe {
    source: Option<Arc<dyn CapabilitySource>>,
}

impl RuntimeCapabilitiesProbe {
    pub fn new(source: Option<Arc<dyn CapabilitySource>>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Probe for RuntimeCapabilitiesProbe {
    fn name(&self) -> ProbeName {
        ProbeName::RuntimeCapabilities
    }

    async fn check(&self, config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let source = self
            .source
            .clone()
            .ok_or(BackendError::NotConfigured("capability source"))?;

        let required = config.capabilities.required.clone();
        let presence = tokio::task::spawn_blocking(move || {
            required
                .into_iter()
                .map(|name| {
                    let present = source.is_available(&name);
                    (name, present)
                })
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| ProbeFault::new(format!("capability lookup task failed: {}", e)))?;

        let mut result = ProbeResult::up();
        for (name, present) in presence {
            if !present {
                tracing::warn!(capability = %name, "Required runtime capability missing");
                result.status = ProbeStatus::Down;
            }
            result = result.with(&name, present);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Only(&'static [&'static str]);

    impl CapabilitySource for Only {
        fn is_available(&self, name: &str) -> bool {
            self.0.contains(&name)
        }
    }

    fn config(required: &[&str]) -> HealthConfig {
        let mut config = HealthConfig::default();
        config.capabilities.required = required.iter().map(|s| s.to_string()).collect();
        config
    }

    #[tokio::test]
    async fn test_presence_map() {
        let probe = RuntimeCapabilitiesProbe::new(Some(Arc::new(Only(&["git", "openssl"]))));

        let result = probe.check(&config(&["git", "openssl", "pg_dump"])).await.unwrap();

        assert_eq!(result.status, ProbeStatus::Down);
        assert_eq!(result.detail["git"], true);
        assert_eq!(result.detail["openssl"], true);
        assert_eq!(result.detail["pg_dump"], false);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_all_present_is_up() {
        let probe = RuntimeCapabilitiesProbe::new(Some(Arc::new(Only(&["git"]))));
        let result = probe.check(&config(&["git"])).await.unwrap();
        assert_eq!(result.status, ProbeStatus::Up);
    }
}
