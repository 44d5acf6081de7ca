//! Metrics collection and exposition.
//!
//! # Metrics
//! - `health_probe_up` (gauge): 1=UP, 0=DOWN, by probe
//! - `health_probe_duration_seconds` (histogram): probe latency, by probe
//! - `health_runs_total` (counter): orchestrator runs, by overall status

use std::net::SocketAddr;
use std::time::Duration;

use ::metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::orchestrator::OverallStatus;
use crate::probe::ProbeName;

/// Install the Prometheus recorder with its own scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_gauge!("health_probe_up", "1 if the probe reported UP on its last run");
    describe_histogram!(
        "health_probe_duration_seconds",
        "Time taken by a single probe"
    );
    describe_counter!("health_runs_total", "Completed orchestrator runs");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_probe_status(probe: ProbeName, up: bool) {
    gauge!("health_probe_up", "probe" => probe.as_str()).set(if up { 1.0 } else { 0.0 });
}

pub fn record_probe_duration(probe: ProbeName, elapsed: Duration) {
    histogram!("health_probe_duration_seconds", "probe" => probe.as_str())
        .record(elapsed.as_secs_f64());
}

pub fn record_run(status: OverallStatus) {
    counter!("health_runs_total", "status" => status.as_str()).increment(1);
}
