//! Check selection from configuration.

use crate::config::ChecksConfig;
use crate::probe::ProbeName;

/// Names whose flag is on, in declaration order. Deterministic across runs.
pub fn select_enabled(checks: &ChecksConfig) -> Vec<ProbeName> {
    ProbeName::ALL
        .into_iter()
        .filter(|name| checks.is_enabled(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(
            select_enabled(&ChecksConfig::default()),
            vec![
                ProbeName::EnvConfig,
                ProbeName::Database,
                ProbeName::Cache,
                ProbeName::Storage,
                ProbeName::Queue,
                ProbeName::DiskSpace,
                ProbeName::Migrations,
                ProbeName::Logging,
            ]
        );
    }

    #[test]
    fn test_order_is_declaration_order() {
        let mut checks = ChecksConfig::all(false);
        checks.logging = true;
        checks.loki = true;
        checks.env_config = true;
        assert_eq!(
            select_enabled(&checks),
            vec![ProbeName::EnvConfig, ProbeName::Loki, ProbeName::Logging]
        );
    }

    #[test]
    fn test_nothing_enabled() {
        assert!(select_enabled(&ChecksConfig::all(false)).is_empty());
    }
}
