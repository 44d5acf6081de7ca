//! Environment configuration probe.

use async_trait::async_trait;

use super::{Probe, ProbeFault, ProbeName, ProbeResult, ProbeStatus};
use crate::config::HealthConfig;

/// DOWN while debug mode is on: an insecure configuration counts as unhealthy.
pub struct EnvConfigProbe;

#[async_trait]
impl Probe for EnvConfigProbe {
    fn name(&self) -> ProbeName {
        ProbeName::EnvConfig
    }

    async fn check(&self, config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let debug = config.app.debug;
        Ok(ProbeResult::new(ProbeStatus::from_bool(!debug))
            .with("debug_mode", debug)
            .with("timezone", config.app.timezone.as_str()))
    }
}
