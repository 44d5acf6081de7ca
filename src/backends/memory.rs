//! In-process cache and object storage.
//!
//! Used as the default cache driver and as stand-ins in tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{BackendError, BackendResult, CacheStore, ObjectStorage};

fn poisoned() -> BackendError {
    BackendError::Invalid("in-memory store lock poisoned".to_string())
}

/// Expiring key-value map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    fn driver(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> BackendResult<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> BackendResult<Option<String>> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> BackendResult<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

/// Object map keyed by path.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    fn disk(&self) -> &str {
        "memory"
    }

    fn root(&self) -> String {
        "memory://".to_string()
    }

    async fn put(&self, path: &str, contents: &[u8]) -> BackendResult<()> {
        let mut objects = self.objects.lock().map_err(|_| poisoned())?;
        objects.insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    async fn exists(&self, path: &str) -> BackendResult<bool> {
        let objects = self.objects.lock().map_err(|_| poisoned())?;
        Ok(objects.contains_key(path))
    }

    async fn delete(&self, path: &str) -> BackendResult<()> {
        let mut objects = self.objects.lock().map_err(|_| poisoned())?;
        objects.remove(path);
        Ok(())
    }
}
