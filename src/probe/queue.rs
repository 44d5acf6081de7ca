//! Queue presence probe. Checks configuration only, no live connection.

use async_trait::async_trait;

use super::{Probe, ProbeFault, ProbeName, ProbeResult};
use crate::config::HealthConfig;

pub struct QueueProbe;

#[async_trait]
impl Probe for QueueProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Queue
    }

    async fn check(&self, config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        match config.queue.default.as_deref().map(str::trim) {
            Some(connection) if !connection.is_empty() => {
                Ok(ProbeResult::up().with("default_connection", connection))
            }
            _ => Err(ProbeFault::new("no default queue connection configured")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeStatus;

    #[tokio::test]
    async fn test_configured_queue_is_up() {
        let result = QueueProbe.check(&HealthConfig::default()).await.unwrap();
        assert_eq!(result.status, ProbeStatus::Up);
        assert_eq!(result.detail["default_connection"], "sync");
    }

    #[tokio::test]
    async fn test_missing_queue_faults() {
        let mut config = HealthConfig::default();
        config.queue.default = Some(" ".into());
        assert!(QueueProbe.check(&config).await.is_err());

        config.queue.default = None;
        assert!(QueueProbe.check(&config).await.is_err());
    }
}
