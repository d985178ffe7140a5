//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the node URL is usable and the representative is a real address
//! - Validate value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AttoConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::str::FromStr;

use thiserror::Error;

use crate::amount::MAX_DECIMALS;
use crate::config::schema::AttoConfig;
use crate::keys::Account;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node.rpc_url '{0}' is not a valid URL")]
    InvalidUrl(String),

    #[error("node.rpc_url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("wallet.default_representative '{0}' is not a valid address")]
    InvalidRepresentative(String),

    #[error("wallet.amount_decimals must be at most {max}, got {value}")]
    DecimalsOutOfRange { value: u32, max: u32 },

    #[error("observability.log_level '{0}' is not a valid level")]
    InvalidLogLevel(String),
}

/// Check every semantic constraint, collecting all failures.
pub fn validate_config(config: &AttoConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.node.rpc_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(_) => errors.push(ValidationError::UnsupportedScheme(config.node.rpc_url.clone())),
        Err(_) => errors.push(ValidationError::InvalidUrl(config.node.rpc_url.clone())),
    }

    if Account::from_str(&config.wallet.default_representative).is_err() {
        errors.push(ValidationError::InvalidRepresentative(
            config.wallet.default_representative.clone(),
        ));
    }

    if config.wallet.amount_decimals > MAX_DECIMALS {
        errors.push(ValidationError::DecimalsOutOfRange {
            value: config.wallet.amount_decimals,
            max: MAX_DECIMALS,
        });
    }

    if tracing::Level::from_str(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
