//! Log aggregation backend probe (Loki build-info endpoint).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{Probe, ProbeFault, ProbeName, ProbeResult};
use crate::backends::BackendError;
use crate::config::HealthConfig;

const BUILD_INFO_PATH: &str = "/loki/api/v1/status/buildinfo";

/// UP iff the build-info endpoint answers with a success status within the
/// client timeout.
pub struct LokiProbe {
    client: reqwest::Client,
}

impl LokiProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn build_info_url(base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), BUILD_INFO_PATH)
    }
}

impl Default for LokiProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn text_field(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

#[async_trait]
impl Probe for LokiProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Loki
    }

    async fn check(&self, config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let base = config
            .loki
            .url
            .as_deref()
            .ok_or_else(|| ProbeFault::new("Loki URL not configured"))?;
        let url = Self::build_info_url(base);

        let response = self
            .client
            .get(&url)
            .timeout(config.loki.timeout())
            .send()
            .await
            .map_err(|e| ProbeFault::from(BackendError::from(e)).with_detail("url", url.as_str()))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(ProbeResult::down()
                .with("url", url)
                .with_error(format!("Loki unreachable (status {})", status.as_u16())));
        }

        // A non-JSON body still proves reachability; fields fall back to "unknown".
        let body: Value = response.json().await.unwrap_or(Value::Null);

        Ok(ProbeResult::up()
            .with("url", url)
            .with("build_date", text_field(&body, "buildDate"))
            .with("version", text_field(&body, "version"))
            .with("go_version", text_field(&body, "goVersion")))
    }

    fn timeout(&self, config: &HealthConfig) -> Duration {
        config.loki.timeout() + Duration::from_millis(500)
    }
}
