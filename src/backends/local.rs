//! Local filesystem adapters: object storage rooted at a directory and an
//! append-only log file.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{BackendError, BackendResult, LogSink, ObjectStorage};

/// Objects stored as files below `root`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve `path` below the root, refusing anything that escapes it.
    fn resolve(&self, path: &str) -> BackendResult<PathBuf> {
        let relative = Path::new(path);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(BackendError::Invalid(format!(
                "object path '{}' must be relative to the storage root",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    fn disk(&self) -> &str {
        "local"
    }

    fn root(&self) -> String {
        self.root.display().to_string()
    }

    async fn put(&self, path: &str, contents: &[u8]) -> BackendResult<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, contents).await?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> BackendResult<bool> {
        let target = self.resolve(path)?;
        Ok(fs::try_exists(&target).await?)
    }

    async fn delete(&self, path: &str) -> BackendResult<()> {
        let target = self.resolve(path)?;
        fs::remove_file(&target).await?;
        Ok(())
    }
}

/// Appends lines to a file, creating it and its directory on demand.
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl LogSink for FileLogSink {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn write_line(&self, line: &str) -> BackendResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", line).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
