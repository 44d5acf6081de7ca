//! Key-value server probe.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::{Probe, ProbeFault, ProbeName, ProbeResult};
use crate::backends::{BackendError, KeyValueServer};
use crate::config::HealthConfig;

/// Asks the server to describe itself and reports version and memory usage.
pub struct RedisProbe {
    server: Option<Arc<dyn KeyValueServer>>,
}

impl RedisProbe {
    pub fn new(server: Option<Arc<dyn KeyValueServer>>) -> Self {
        Self { server }
    }
}

#[async_trait]
impl Probe for RedisProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Redis
    }

    async fn check(&self, _config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let server = self
            .server
            .as_ref()
            .ok_or(BackendError::NotConfigured("redis connection"))?;

        let info = server.info().await?;
        let field = |key: &str| info.get(key).map(String::as_str).unwrap_or("NA");

        Ok(ProbeResult::up()
            .with("version", field("redis_version"))
            .with("service", field("executable"))
            .with(
                "memory",
                json!({
                    "used": field("used_memory_human"),
                    "peak": field("used_memory_peak_human"),
                }),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::BackendResult;
    use crate::probe::ProbeStatus;
    use std::collections::HashMap;

    struct StaticInfo(HashMap<String, String>);

    #[async_trait]
    impl KeyValueServer for StaticInfo {
        async fn info(&self) -> BackendResult<HashMap<String, String>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_reports_version_and_memory() {
        let info = HashMap::from([
            ("redis_version".to_string(), "7.2.4".to_string()),
            ("used_memory_human".to_string(), "1.05M".to_string()),
        ]);
        let probe = RedisProbe::new(Some(Arc::new(StaticInfo(info))));

        let result = probe.check(&HealthConfig::default()).await.unwrap();

        assert_eq!(result.status, ProbeStatus::Up);
        assert_eq!(result.detail["version"], "7.2.4");
        assert_eq!(result.detail["service"], "NA");
        assert_eq!(result.detail["memory"]["used"], "1.05M");
        assert_eq!(result.detail["memory"]["peak"], "NA");
    }

    #[tokio::test]
    async fn test_unconfigured_server_faults() {
        let fault = RedisProbe::new(None)
            .check(&HealthConfig::default())
            .await
            .unwrap_err();
        assert_eq!(fault.message(), "redis connection not configured");
    }
}
