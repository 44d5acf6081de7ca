//! Concurrent probe execution with per-probe failure isolation.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::error::Elapsed;

use super::registry::ProbeRegistry;
use super::report::{Checks, HealthReport};
use super::selector::select_enabled;
use crate::config::HealthConfig;
use crate::observability::metrics;
use crate::probe::{ProbeFault, ProbeName, ProbeResult};

type ProbeOutcome = (Result<Result<ProbeResult, ProbeFault>, Elapsed>, Duration);

struct PendingProbe {
    name: ProbeName,
    limit: Duration,
    handle: JoinHandle<ProbeOutcome>,
}

/// In-flight probe tasks. Whatever has not been collected when this is
/// dropped (the caller went away mid-run) is aborted.
#[derive(Default)]
struct ProbeTasks(VecDeque<PendingProbe>);

impl Drop for ProbeTasks {
    fn drop(&mut self) {
        for pending in &self.0 {
            pending.handle.abort();
        }
    }
}

/// Runs the enabled probes and assembles a [`HealthReport`].
///
/// The registry is fixed at construction; the configuration can be swapped
/// between runs and each run works from one consistent snapshot.
pub struct Orchestrator {
    registry: Arc<ProbeRegistry>,
    config: ArcSwap<HealthConfig>,
}

impl Orchestrator {
    pub fn new(registry: ProbeRegistry, config: HealthConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config: ArcSwap::from_pointee(config),
        }
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<HealthConfig> {
        self.config.load_full()
    }

    /// Takes effect from the next run; runs in flight keep their snapshot.
    pub fn update_config(&self, config: HealthConfig) {
        self.config.store(Arc::new(config));
        tracing::info!("Health check configuration updated");
    }

    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    /// Executes every enabled probe concurrently. Never fails: faults,
    /// panics and timeouts of individual probes become DOWN entries.
    pub async fn run(&self) -> HealthReport {
        let config = self.config.load_full();
        let deadline = config.orchestrator.deadline();
        let mut tasks = ProbeTasks::default();

        for name in select_enabled(&config.checks) {
            let probe = match self.registry.resolve(name) {
                Ok(probe) => probe,
                Err(e) => {
                    tracing::error!(
                        probe = %name,
                        error = %e,
                        "Enabled probe is not registered, skipping"
                    );
                    continue;
                }
            };

            let mut limit = probe.timeout(&config);
            if let Some(deadline) = deadline {
                limit = limit.min(deadline);
            }

            let snapshot = Arc::clone(&config);
            let handle = tokio::spawn(async move {
                let started = Instant::now();
                let outcome = tokio::time::timeout(limit, probe.check(&snapshot)).await;
                (outcome, started.elapsed())
            });
            tasks.0.push_back(PendingProbe { name, limit, handle });
        }

        let mut checks = Checks::new();
        while let Some(pending) = tasks.0.front_mut() {
            let joined = (&mut pending.handle).await;
            let (name, limit) = (pending.name, pending.limit);
            tasks.0.pop_front();

            let result = collect(name, limit, joined);
            checks.push(name, result);
        }

        let report = HealthReport::new(checks);
        metrics::record_run(report.status);
        tracing::debug!(
            status = %report.status,
            probes = report.checks.len(),
            "Health check run complete"
        );
        report
    }
}

fn collect(
    name: ProbeName,
    limit: Duration,
    joined: Result<ProbeOutcome, JoinError>,
) -> ProbeResult {
    let result = match joined {
        Ok((Ok(Ok(result)), elapsed)) => {
            metrics::record_probe_duration(name, elapsed);
            result
        }
        Ok((Ok(Err(fault)), elapsed)) => {
            metrics::record_probe_duration(name, elapsed);
            tracing::warn!(probe = %name, error = %fault, "Probe failed");
            ProbeResult::from(fault)
        }
        Ok((Err(_), elapsed)) => {
            metrics::record_probe_duration(name, elapsed);
            tracing::warn!(probe = %name, limit_ms = limit.as_millis() as u64, "Probe timed out");
            ProbeResult::failed(format!("timed out after {}ms", limit.as_millis()))
        }
        Err(e) if e.is_panic() => {
            let message = panic_message(e.into_panic());
            tracing::error!(probe = %name, panic = %message, "Probe panicked");
            ProbeResult::failed(format!("probe panicked: {message}"))
        }
        Err(_) => ProbeResult::failed("probe cancelled"),
    };
    metrics::record_probe_status(name, result.is_up());
    result
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
