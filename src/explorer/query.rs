//! Validated path parameters.
//!
//! Both checks run before any upstream call is made.

use alloy::primitives::{Address, TxHash};

use crate::explorer::types::ApiError;

/// Account address as supplied by the caller: `0x` + 40 hex digits.
///
/// The caller's spelling is kept and forwarded upstream; no checksum is verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery(String);

impl AddressQuery {
    pub const LEN: usize = 42;

    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        if raw.len() == Self::LEN && raw.starts_with("0x") && raw.parse::<Address>().is_ok() {
            Ok(Self(raw.to_string()))
        } else {
            Err(ApiError::InvalidAddress)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison with another address string.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

/// Transaction hash: `0x` + 64 hex digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHashQuery(String);

impl TxHashQuery {
    pub const LEN: usize = 66;

    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        if raw.len() == Self::LEN && raw.starts_with("0x") && raw.parse::<TxHash>().is_ok() {
            Ok(Self(raw.to_string()))
        } else {
            Err(ApiError::InvalidTransactionHash)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
