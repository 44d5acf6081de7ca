//! Orchestrator behaviour with misbehaving probes.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{config_with, FailingProbe, FixedProbe, HangingProbe, PanickingProbe};
use health_orchestrator::backends::CapabilitySource;
use health_orchestrator::orchestrator::{Orchestrator, ProbeRegistry};
use health_orchestrator::probe::RuntimeCapabilitiesProbe;
use health_orchestrator::report::{to_human_readable, to_machine_readable};
use health_orchestrator::{OverallStatus, Probe, ProbeName, ProbeResult, ProbeStatus};

fn registry(probes: Vec<Arc<dyn Probe>>) -> ProbeRegistry {
    let mut registry = ProbeRegistry::new();
    for probe in probes {
        registry.register(probe).unwrap();
    }
    registry
}

#[tokio::test]
async fn test_nothing_enabled_is_unhealthy() {
    let orchestrator = Orchestrator::new(
        registry(vec![Arc::new(FixedProbe::up(ProbeName::Database))]),
        config_with(&[]),
    );

    let report = orchestrator.run().await;

    assert_eq!(report.status, OverallStatus::Unhealthy);
    assert!(report.checks.is_empty());
}

#[tokio::test]
async fn test_all_up_is_healthy() {
    let orchestrator = Orchestrator::new(
        registry(vec![
            Arc::new(FixedProbe::up(ProbeName::Database)),
            Arc::new(FixedProbe::up(ProbeName::Cache)),
        ]),
        config_with(&[ProbeName::Database, ProbeName::Cache]),
    );

    let report = orchestrator.run().await;

    assert_eq!(report.status, OverallStatus::Healthy);
    assert_eq!(report.checks.len(), 2);
}

#[tokio::test]
async fn test_one_down_makes_run_unhealthy() {
    let disk = ProbeResult::down()
        .with("used_percentage", "95%")
        .with("threshold", "90%");
    let orchestrator = Orchestrator::new(
        registry(vec![
            Arc::new(FixedProbe::up(ProbeName::Database)),
            Arc::new(FixedProbe::new(ProbeName::DiskSpace, disk)),
        ]),
        config_with(&[ProbeName::Database, ProbeName::DiskSpace]),
    );

    let report = orchestrator.run().await;
    let disk = report.checks.get(ProbeName::DiskSpace).unwrap();

    assert_eq!(report.status, OverallStatus::Unhealthy);
    assert_eq!(disk.status, ProbeStatus::Down);
    assert!(disk.error.is_none());
    assert!(report.checks.get(ProbeName::Database).unwrap().is_up());
}

#[tokio::test]
async fn test_disabled_probe_is_absent_and_not_invoked() {
    let mail = Arc::new(FixedProbe::up(ProbeName::Mail));
    let orchestrator = Orchestrator::new(
        registry(vec![
            mail.clone() as Arc<dyn Probe>,
            Arc::new(FixedProbe::up(ProbeName::Queue)),
        ]),
        config_with(&[ProbeName::Queue]),
    );

    let report = orchestrator.run().await;

    assert!(report.checks.get(ProbeName::Mail).is_none());
    assert_eq!(mail.calls(), 0);
    assert!(report.is_healthy());
}

#[tokio::test]
async fn test_fault_is_isolated() {
    let orchestrator = Orchestrator::new(
        registry(vec![
            Arc::new(FailingProbe(ProbeName::Database, "connection refused")),
            Arc::new(FixedProbe::up(ProbeName::Cache)),
        ]),
        config_with(&[ProbeName::Database, ProbeName::Cache]),
    );

    let report = orchestrator.run().await;
    let database = report.checks.get(ProbeName::Database).unwrap();

    assert_eq!(database.status, ProbeStatus::Down);
    assert_eq!(database.error.as_deref(), Some("connection refused"));
    assert!(report.checks.get(ProbeName::Cache).unwrap().is_up());
    assert_eq!(report.status, OverallStatus::Unhealthy);
}

#[tokio::test]
async fn test_panic_is_isolated() {
    let orchestrator = Orchestrator::new(
        registry(vec![
            Arc::new(PanickingProbe(ProbeName::Redis)),
            Arc::new(FixedProbe::up(ProbeName::Storage)),
        ]),
        config_with(&[ProbeName::Redis, ProbeName::Storage]),
    );

    let report = orchestrator.run().await;
    let redis = report.checks.get(ProbeName::Redis).unwrap();

    assert_eq!(redis.status, ProbeStatus::Down);
    assert_eq!(redis.error.as_deref(), Some("probe panicked: backend exploded"));
    assert!(report.checks.get(ProbeName::Storage).unwrap().is_up());
}

#[tokio::test]
async fn test_hanging_probe_times_out_without_blocking_others() {
    let mut config = config_with(&[ProbeName::Loki, ProbeName::Queue]);
    config.orchestrator.probe_timeout_ms = 100;
    let orchestrator = Orchestrator::new(
        registry(vec![
            Arc::new(HangingProbe(ProbeName::Loki)),
            Arc::new(FixedProbe::up(ProbeName::Queue)),
        ]),
        config,
    );

    let started = Instant::now();
    let report = orchestrator.run().await;

    assert!(started.elapsed() < Duration::from_secs(5));
    let loki = report.checks.get(ProbeName::Loki).unwrap();
    assert_eq!(loki.error.as_deref(), Some("timed out after 100ms"));
    assert!(report.checks.get(ProbeName::Queue).unwrap().is_up());
}

/// Blocks the calling thread, like a lookup on an unresponsive mount.
struct StalledLookup;

impl CapabilitySource for StalledLookup {
    fn is_available(&self, _name: &str) -> bool {
        std::thread::sleep(Duration::from_secs(2));
        true
    }
}

#[tokio::test]
async fn test_timeout_bounds_blocking_capability_lookup() {
    let mut config = config_with(&[ProbeName::RuntimeCapabilities, ProbeName::Queue]);
    config.orchestrator.probe_timeout_ms = 100;
    config.capabilities.required = vec!["git".to_string()];
    let orchestrator = Orchestrator::new(
        registry(vec![
            Arc::new(RuntimeCapabilitiesProbe::new(Some(Arc::new(StalledLookup)))),
            Arc::new(FixedProbe::up(ProbeName::Queue)),
        ]),
        config,
    );

    let started = Instant::now();
    let report = orchestrator.run().await;

    assert!(started.elapsed() < Duration::from_millis(1500));
    let capabilities = report.checks.get(ProbeName::RuntimeCapabilities).unwrap();
    assert_eq!(capabilities.status, ProbeStatus::Down);
    assert_eq!(capabilities.error.as_deref(), Some("timed out after 100ms"));
    assert!(report.checks.get(ProbeName::Queue).unwrap().is_up());
}

#[tokio::test]
async fn test_enabled_but_unregistered_probe_is_skipped() {
    let orchestrator = Orchestrator::new(
        registry(vec![Arc::new(FixedProbe::up(ProbeName::Queue))]),
        config_with(&[ProbeName::Queue, ProbeName::Loki]),
    );

    let report = orchestrator.run().await;

    assert_eq!(report.checks.names(), vec![ProbeName::Queue]);
    assert!(report.is_healthy());
}

#[tokio::test]
async fn test_results_follow_declaration_order() {
    let orchestrator = Orchestrator::new(
        registry(vec![
            Arc::new(FixedProbe::up(ProbeName::Logging)),
            Arc::new(FixedProbe::up(ProbeName::EnvConfig)),
            Arc::new(FixedProbe::up(ProbeName::DiskSpace)),
        ]),
        config_with(&[ProbeName::Logging, ProbeName::EnvConfig, ProbeName::DiskSpace]),
    );

    let report = orchestrator.run().await;

    assert_eq!(
        report.checks.names(),
        vec![ProbeName::EnvConfig, ProbeName::DiskSpace, ProbeName::Logging]
    );
}

#[tokio::test]
async fn test_repeated_runs_report_same_keys() {
    let orchestrator = Orchestrator::new(
        registry(vec![
            Arc::new(FixedProbe::up(ProbeName::Database)),
            Arc::new(FailingProbe(ProbeName::Cache, "timeout")),
        ]),
        config_with(&[ProbeName::Database, ProbeName::Cache]),
    );

    let first = orchestrator.run().await;
    let second = orchestrator.run().await;

    assert_eq!(first.checks.names(), second.checks.names());
    assert_eq!(first.status, second.status);
}

#[tokio::test]
async fn test_renderings_agree() {
    let orchestrator = Orchestrator::new(
        registry(vec![
            Arc::new(FixedProbe::up(ProbeName::Database)),
            Arc::new(FailingProbe(ProbeName::Cache, "connection refused")),
        ]),
        config_with(&[ProbeName::Database, ProbeName::Cache]),
    );

    let report = orchestrator.run().await;
    let json = to_machine_readable(&report);
    let lines = to_human_readable(&report);

    assert_eq!(json["status"], "unhealthy");
    assert_eq!(lines[0], "System Status: ❌ UNHEALTHY");
    let timestamp = json["timestamp"].as_str().unwrap();
    assert_eq!(lines[1], format!("Timestamp: {timestamp}"));
    assert!(lines[2].contains("database") && lines[2].ends_with("UP"));
    assert!(lines[3].contains("DOWN  ↳ Error: connection refused"));
    assert_eq!(json["checks"]["cache"]["error"], "connection refused");
}
