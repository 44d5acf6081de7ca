//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::HealthConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::probe::ProbeName;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for environment variable {key}")]
    Env { key: String, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply the process
/// environment on top.
pub fn load_config(path: &Path) -> Result<HealthConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: HealthConfig = toml::from_str(&content)?;
    finish(config, std::env::vars())
}

/// Load from `path` when given, otherwise start from defaults. The environment
/// overlay and validation apply either way.
pub fn load_or_default(path: Option<&Path>) -> Result<HealthConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => finish(HealthConfig::default(), std::env::vars()),
    }
}

fn finish<I>(mut config: HealthConfig, vars: I) -> Result<HealthConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    apply_env_overrides(&mut config, vars)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `HEALTHCHECK_<NAME>` flags and named parameter overrides.
pub fn apply_env_overrides<I>(config: &mut HealthConfig, vars: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        if let Some(name) = ProbeName::ALL.into_iter().find(|n| n.env_key() == key) {
            let enabled = parse_flag(&key, &value)?;
            config.checks.set(name, enabled);
            continue;
        }

        match key.as_str() {
            "APP_DEBUG" => config.app.debug = parse_flag(&key, &value)?,
            "APP_TIMEZONE" => config.app.timezone = value,
            "DATABASE_URL" => config.database.url = non_empty(value),
            "REDIS_URL" => config.redis.url = non_empty(value),
            "LOKI_URL" => config.loki.url = non_empty(value),
            _ => {}
        }
    }
    Ok(())
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Env {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
