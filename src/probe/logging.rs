//! Logging pipeline probe.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use super::{Probe, ProbeFault, ProbeName, ProbeResult};
use crate::backends::{BackendError, LogSink};
use crate::config::HealthConfig;

/// Appends a test line to the log file, then routes it through `tracing`.
pub struct LoggingProbe {
    sink: Option<Arc<dyn LogSink>>,
}

impl LoggingProbe {
    pub fn new(sink: Option<Arc<dyn LogSink>>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl Probe for LoggingProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Logging
    }

    async fn check(&self, _config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let sink = self
            .sink
            .as_ref()
            .ok_or(BackendError::NotConfigured("log sink"))?;

        let line = format!(
            "[{}] Health check log test",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
        );
        sink.write_line(&line).await?;
        tracing::info!(target: "health_check", "{}", line);

        Ok(ProbeResult::up().with("log_path", sink.location()))
    }
}
