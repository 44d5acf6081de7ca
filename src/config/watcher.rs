//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::HealthConfig;

/// Watches the configuration file and publishes every valid reload.
///
/// Invalid files are logged and dropped; the orchestrator keeps running on the
/// last good configuration.
pub struct ConfigWatcher {
    path: PathBuf,
    updates: mpsc::UnboundedSender<HealthConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its update channel.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<HealthConfig>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            updates,
        };
        (watcher, rx)
    }

    /// Start watching. The returned handle must be kept alive for as long as
    /// reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, updates } = self;
        let reload_path = path.clone();

        let handler = move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(error = ?e, "Config watch error");
                    return;
                }
            };
            if !(event.kind.is_modify() || event.kind.is_create()) {
                return;
            }

            match load_config(&reload_path) {
                Ok(config) => {
                    tracing::info!(path = %reload_path.display(), "Configuration reloaded");
                    if updates.send(config).is_err() {
                        tracing::debug!("Config update receiver dropped");
                    }
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Rejected configuration reload, keeping current configuration"
                    );
                }
            }
        };

        let mut watcher = RecommendedWatcher::new(
            handler,
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Config watcher started");
        Ok(watcher)
    }
}
