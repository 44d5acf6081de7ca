//! Migration-tracking table probe.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Probe, ProbeFault, ProbeName, ProbeResult, ProbeStatus};
use crate::backends::Database;
use crate::config::validation::is_sql_identifier;
use crate::config::HealthConfig;

/// UP iff the migration table holds at least one row. The table name is
/// reported on every path, including faults.
pub struct MigrationsProbe {
    database: Option<Arc<dyn Database>>,
}

impl MigrationsProbe {
    pub fn new(database: Option<Arc<dyn Database>>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl Probe for MigrationsProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Migrations
    }

    async fn check(&self, config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let table = config.database.migrations_table.as_str();
        let fault = |message: String| ProbeFault::new(message).with_detail("table_name", table);

        let database = self
            .database
            .as_ref()
            .ok_or_else(|| fault("database connection not configured".to_string()))?;
        if !is_sql_identifier(table) {
            return Err(fault(format!("'{}' is not a valid table name", table)));
        }

        let total = database
            .count_rows(table)
            .await
            .map_err(|e| fault(e.to_string()))?;

        Ok(ProbeResult::new(ProbeStatus::from_bool(total > 0))
            .with("table_name", table)
            .with("total_migrations", total))
    }
}
