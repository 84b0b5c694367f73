//! Numeric parsing and unit conversion for chain quantities.
//!
//! Upstream mixes decimal strings (`account` module) and `0x` hex quantities
//! (`proxy` module). Everything is parsed into `U256` first and only turned
//! into `f64` for display.

use alloy::primitives::U256;
use thiserror::Error;

/// Decimals of the native currency (wei → ether).
pub const ETHER_DECIMALS: u8 = 18;
/// Decimals between wei and gwei.
pub const GWEI_DECIMALS: u8 = 9;
/// Decimals assumed for every ERC-20 token balance.
pub const TOKEN_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("'{0}' is not a 0x-prefixed hex quantity")]
    InvalidHex(String),

    #[error("'{0}' is not a decimal integer")]
    InvalidDecimal(String),

    #[error("value {0} does not fit in {1} bits")]
    Overflow(U256, u32),
}

/// Parse a `0x`-prefixed hex quantity such as `"0xde0b6b3a7640000"`.
pub fn parse_quantity(s: &str) -> Result<U256, UnitError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| UnitError::InvalidHex(s.to_string()))?;
    if digits.is_empty() {
        return Err(UnitError::InvalidHex(s.to_string()));
    }
    U256::from_str_radix(digits, 16).map_err(|_| UnitError::InvalidHex(s.to_string()))
}

/// Parse an unsigned decimal integer such as `"1000000000000000000"`.
pub fn parse_decimal(s: &str) -> Result<U256, UnitError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UnitError::InvalidDecimal(s.to_string()));
    }
    U256::from_str_radix(trimmed, 10).map_err(|_| UnitError::InvalidDecimal(s.to_string()))
}

pub fn to_u64(value: U256) -> Result<u64, UnitError> {
    u64::try_from(value).map_err(|_| UnitError::Overflow(value, 64))
}

pub fn to_u128(value: U256) -> Result<u128, UnitError> {
    u128::try_from(value).map_err(|_| UnitError::Overflow(value, 128))
}

/// Divide `value` by `10^decimals` in floating point.
///
/// `value` is first rounded to the nearest `f64`, then divided by the exactly
/// representable power of ten, so large amounts may differ from the exact
/// decimal quotient in the last digit.
pub fn scale_down(value: U256, decimals: u8) -> f64 {
    // Decimal digits always parse; values beyond f64 range become infinity.
    let amount: f64 = value.to_string().parse().unwrap_or(f64::INFINITY);
    amount / 10f64.powi(i32::from(decimals))
}

pub fn wei_to_ether(wei: U256) -> f64 {
    scale_down(wei, ETHER_DECIMALS)
}

pub fn wei_to_gwei(wei: U256) -> f64 {
    scale_down(wei, GWEI_DECIMALS)
}

/// Round to `places` decimal places.
///
/// Rounds the exact binary value of `value`, with exact ties going to even.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}
