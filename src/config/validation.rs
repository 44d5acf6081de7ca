//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges, addresses and
//! identifiers. Every problem is collected so a single pass reports them all.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::HealthConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &HealthConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if !config.server.path.starts_with('/') {
        errors.push(ValidationError::new("server.path", "must start with '/'"));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be > 0"));
    }

    if config.orchestrator.probe_timeout_ms == 0 {
        errors.push(ValidationError::new("orchestrator.probe_timeout_ms", "must be > 0"));
    }
    if config.orchestrator.deadline_ms == Some(0) {
        errors.push(ValidationError::new("orchestrator.deadline_ms", "must be > 0"));
    }

    let threshold = config.disk.threshold_percent;
    if !(threshold > 0.0 && threshold <= 100.0) {
        errors.push(ValidationError::new(
            "disk.threshold_percent",
            format!("{} is outside (0, 100]", threshold),
        ));
    }
    if config.disk.precision > 6 {
        errors.push(ValidationError::new("disk.precision", "must be <= 6"));
    }
    if config.disk.path.is_empty() {
        errors.push(ValidationError::new("disk.path", "must not be empty"));
    }

    if !is_sql_identifier(&config.database.migrations_table) {
        errors.push(ValidationError::new(
            "database.migrations_table",
            format!("'{}' is not a plain SQL identifier", config.database.migrations_table),
        ));
    }

    if let Some(raw) = &config.loki.url {
        if let Err(e) = url::Url::parse(raw) {
            errors.push(ValidationError::new("loki.url", format!("'{}': {}", raw, e)));
        }
    }
    if config.loki.timeout_secs == 0 {
        errors.push(ValidationError::new("loki.timeout_secs", "must be > 0"));
    }

    for name in &config.capabilities.required {
        if name.is_empty() || name == "status" || name == "error" {
            errors.push(ValidationError::new(
                "capabilities.required",
                format!("'{}' is not a usable capability name", name),
            ));
        }
    }

    if config.metrics.enabled && config.metrics.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "metrics.address",
            format!("'{}' is not a socket address", config.metrics.address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Letters, digits and underscores, optionally schema-qualified with one dot.
pub fn is_sql_identifier(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
