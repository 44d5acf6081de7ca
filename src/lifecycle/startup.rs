//! Startup wiring.

use crate::backends::Backends;
use crate::config::HealthConfig;
use crate::orchestrator::{select_enabled, Orchestrator, ProbeRegistry};

/// Wire backends from `config`, register the standard probes and hand the
/// configuration to a new orchestrator.
pub fn build_orchestrator(config: HealthConfig) -> Orchestrator {
    let backends = Backends::from_config(&config);
    let registry = ProbeRegistry::standard(&backends);

    let enabled: Vec<&str> = select_enabled(&config.checks)
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    tracing::info!(
        registered = registry.len(),
        enabled = ?enabled,
        "Probes registered"
    );

    Orchestrator::new(registry, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChecksConfig;
    use crate::probe::ProbeName;

    #[tokio::test]
    async fn test_env_config_only_run() {
        let mut config = HealthConfig::default();
        config.checks = ChecksConfig::all(false);
        config.checks.env_config = true;

        let orchestrator = build_orchestrator(config);
        let report = orchestrator.run().await;

        assert_eq!(orchestrator.registry().len(), ProbeName::ALL.len());
        assert!(report.is_healthy());
        let env = report.checks.get(ProbeName::EnvConfig).unwrap();
        assert_eq!(env.detail["debug_mode"], false);
        assert_eq!(env.detail["timezone"], "UTC");
    }

    #[tokio::test]
    async fn test_unconfigured_database_reports_down() {
        let mut config = HealthConfig::default();
        config.checks = ChecksConfig::all(false);
        config.checks.database = true;

        let report = build_orchestrator(config).run().await;
        let database = report.checks.get(ProbeName::Database).unwrap();

        assert!(!report.is_healthy());
        assert_eq!(database.error.as_deref(), Some("database connection not configured"));
    }
}
