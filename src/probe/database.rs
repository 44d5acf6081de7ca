//! Primary database probe.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Probe, ProbeFault, ProbeName, ProbeResult};
use crate::backends::{BackendError, Database};
use crate::config::HealthConfig;

/// Opens the primary connection and counts the tables of the configured schema.
pub struct DatabaseProbe {
    database: Option<Arc<dyn Database>>,
}

impl DatabaseProbe {
    pub fn new(database: Option<Arc<dyn Database>>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl Probe for DatabaseProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Database
    }

    async fn check(&self, config: &HealthConfig) -> Result<ProbeResult, ProbeFault> {
        let database = self
            .database
            .as_ref()
            .ok_or(BackendError::NotConfigured("database connection"))?;

        let schema = &config.database.schema;
        let info = database.inspect(schema).await?;

        Ok(ProbeResult::up()
            .with("database", info.name)
            .with("schema", schema.as_str())
            .with("database_type", info.driver)
            .with("total_tables", info.total_tables))
    }
}
