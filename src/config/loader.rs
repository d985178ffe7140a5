//! Configuration loading from the environment and, optionally, disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AttoConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Names a TOML config file to read. Unset means no file is read.
pub const CONFIG_PATH_ENV_VAR: &str = "ATTO_CONFIG";

/// Overrides `node.rpc_url`.
pub const NODE_URL_ENV_VAR: &str = "ATTO_NODE_URL";

/// Overrides `wallet.default_representative`.
pub const REPRESENTATIVE_ENV_VAR: &str = "ATTO_REPRESENTATIVE";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

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

fn read_config(path: &Path) -> Result<AttoConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build the configuration from the process environment.
pub fn load() -> Result<AttoConfig, ConfigError> {
    load_from(|name| std::env::var(name).ok())
}

/// Build the configuration from `lookup`, which stands in for the environment.
pub fn load_from<F>(lookup: F) -> Result<AttoConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_PATH_ENV_VAR) {
        Some(path) => {
            tracing::debug!(path = %path, "Loading config file");
            read_config(Path::new(&path))?
        }
        None => AttoConfig::default(),
    };

    if let Some(url) = lookup(NODE_URL_ENV_VAR) {
        config.node.rpc_url = url;
    }
    if let Some(representative) = lookup(REPRESENTATIVE_ENV_VAR) {
        config.wallet.default_representative = representative;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
