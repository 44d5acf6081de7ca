//! SQL adapter built on sea-orm.
//!
//! A connection is opened for each inspection and closed before returning, so
//! the probe never holds a pool between runs.

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, DatabaseConnection, DbBackend, QueryResult, Statement,
};

use super::{BackendError, BackendResult, Database, DatabaseInfo};

#[derive(Debug, Clone)]
pub struct SqlDatabase {
    url: String,
    connect_timeout: Duration,
}

impl SqlDatabase {
    pub fn new(url: &str, connect_timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            connect_timeout,
        }
    }

    async fn connect(&self) -> BackendResult<DatabaseConnection> {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(1)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.connect_timeout)
            .sqlx_logging(false);
        Ok(sea_orm::Database::connect(options).await?)
    }
}

fn driver_name(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::Postgres => "pgsql",
        DbBackend::MySql => "mysql",
        DbBackend::Sqlite => "sqlite",
    }
}

fn read_count(row: Option<QueryResult>) -> BackendResult<u64> {
    let row = row.ok_or_else(|| BackendError::Invalid("count query returned no row".into()))?;
    let count: i64 = row.try_get("", "count")?;
    Ok(count.max(0) as u64)
}

async fn database_name(conn: &DatabaseConnection) -> BackendResult<String> {
    let backend = conn.get_database_backend();
    let sql = match backend {
        DbBackend::Postgres => "SELECT current_database() AS name",
        DbBackend::MySql => "SELECT DATABASE() AS name",
        DbBackend::Sqlite => return Ok("main".to_string()),
    };
    let row = conn
        .query_one(Statement::from_string(backend, sql))
        .await?
        .ok_or_else(|| BackendError::Invalid("database name query returned no row".into()))?;
    Ok(row.try_get("", "name")?)
}

async fn count_tables(conn: &DatabaseConnection, schema: &str) -> BackendResult<u64> {
    let backend = conn.get_database_backend();
    let statement = match backend {
        DbBackend::Postgres => Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS count FROM information_schema.tables WHERE table_schema = $1",
            [schema.into()],
        ),
        DbBackend::MySql => Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS count FROM information_schema.tables WHERE table_schema = ?",
            [schema.into()],
        ),
        DbBackend::Sqlite => Statement::from_string(
            backend,
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table'",
        ),
    };
    read_count(conn.query_one(statement).await?)
}

#[async_trait]
impl Database for SqlDatabase {
    async fn inspect(&self, schema: &str) -> BackendResult<DatabaseInfo> {
        let conn = self.connect().await?;
        let driver = driver_name(conn.get_database_backend()).to_string();

        let outcome = async {
            let name = database_name(&conn).await?;
            let total_tables = count_tables(&conn, schema).await?;
            Ok::<_, BackendError>((name, total_tables))
        }
        .await;

        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "Failed to close database connection");
        }

        let (name, total_tables) = outcome?;
        Ok(DatabaseInfo {
            name,
            driver,
            total_tables,
        })
    }

    async fn count_rows(&self, table: &str) -> BackendResult<u64> {
        let conn = self.connect().await?;
        let backend = conn.get_database_backend();
        let sql = format!("SELECT COUNT(*) AS count FROM {}", table);

        let outcome = conn.query_one(Statement::from_string(backend, sql)).await;

        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "Failed to close database connection");
        }

        read_count(outcome?)
    }
}
