//! Redis adapter: cache driver and INFO source.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::time::timeout;

use super::{BackendError, BackendResult, CacheStore, KeyValueServer};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Redis client. A connection is opened per operation and dropped afterwards.
#[derive(Debug, Clone)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    /// Parse the URL. Does not connect.
    pub fn open(url: &str) -> BackendResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> BackendResult<MultiplexedConnection> {
        match timeout(CONNECT_TIMEOUT, self.client.get_multiplexed_async_connection()).await {
            Ok(conn) => Ok(conn?),
            Err(_) => Err(BackendError::Invalid(format!(
                "Redis connection timed out after {}s",
                CONNECT_TIMEOUT.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    fn driver(&self) -> &str {
        "redis"
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> BackendResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> BackendResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueServer for RedisStore {
    async fn info(&self) -> BackendResult<HashMap<String, String>> {
        let mut conn = self.connection().await?;
        let raw: String = redis::cmd("INFO").query_async(&mut conn).await?;
        Ok(parse_info(&raw))
    }
}

/// Parse `key:value` lines of an INFO reply, skipping section headers.
pub fn parse_info(raw: &str) -> HashMap<String, String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
