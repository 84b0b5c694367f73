//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, port non-zero)
//! - Check token registry entries are usable addresses
//! - Check CORS origins can be sent as header values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ExplorerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use alloy::primitives::Address;
use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::ExplorerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener port must be non-zero")]
    ZeroPort,

    #[error("upstream base_url '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("upstream timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("token {symbol} has invalid contract address '{address}'")]
    InvalidTokenAddress { symbol: String, address: String },

    #[error("token symbol {0} is listed more than once")]
    DuplicateTokenSymbol(String),

    #[error("CORS origin '{0}' is not a valid header value")]
    InvalidOrigin(String),
}

/// Validate a fully-merged configuration.
pub fn validate_config(config: &ExplorerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if let Err(e) = url::Url::parse(&config.upstream.base_url) {
        errors.push(ValidationError::InvalidBaseUrl {
            url: config.upstream.base_url.clone(),
            reason: e.to_string(),
        });
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let mut seen = HashSet::new();
    for token in config.tokens.iter() {
        if !token.address.starts_with("0x") || token.address.parse::<Address>().is_err() {
            errors.push(ValidationError::InvalidTokenAddress {
                symbol: token.symbol.clone(),
                address: token.address.clone(),
            });
        }
        if !seen.insert(token.symbol.as_str()) {
            errors.push(ValidationError::DuplicateTokenSymbol(token.symbol.clone()));
        }
    }

    for origin in &config.cors.allowed_origins {
        if origin != "*" && HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
