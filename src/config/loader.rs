//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ExplorerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the upstream API credential.
pub const ENV_API_KEY: &str = "ETHERSCAN_APIKEY";
/// Environment variable holding the listening port.
pub const ENV_PORT: &str = "PORT";
pub const ENV_BASE_URL: &str = "ETHERSCAN_BASE_URL";
/// Comma separated list of allowed origins.
pub const ENV_CORS_ORIGINS: &str = "CORS_ORIGINS";
pub const ENV_PACING: &str = "UPSTREAM_PACING";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {reason}")]
    Env { name: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file into a config without validating it.
pub fn read_config_file(path: &Path) -> Result<ExplorerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides on top of `config`.
///
/// `lookup` abstracts `std::env::var` so overrides can be exercised without
/// touching the real process environment.
pub fn apply_env_overrides<F>(config: &mut ExplorerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
        config.upstream.api_key = Some(key);
    }

    if let Some(port) = lookup(ENV_PORT) {
        config.listener.port = port
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::Env {
                name: ENV_PORT,
                reason: e.to_string(),
            })?;
    }

    if let Some(url) = lookup(ENV_BASE_URL) {
        config.upstream.base_url = url;
    }

    if let Some(origins) = lookup(ENV_CORS_ORIGINS) {
        config.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(mode) = lookup(ENV_PACING) {
        config.upstream.pacing = mode
            .parse()
            .map_err(|reason| ConfigError::Env { name: ENV_PACING, reason })?;
    }

    Ok(())
}

/// Load configuration: defaults, then the optional file, then the environment.
pub fn load_config(path: Option<&Path>) -> Result<ExplorerConfig, ConfigError> {
    let mut config = match path {
        Some(p) => read_config_file(p)?,
        None => ExplorerConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
