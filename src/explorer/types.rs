//! Response shapes and the errors a caller can see.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Literal returned in `to` when a transaction deploys a contract.
pub const CONTRACT_CREATION: &str = "Contract Creation";

/// Errors surfaced to the caller. Upstream failures never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Invalid address format. Must be 42 characters starting with 0x.")]
    InvalidAddress,

    #[error("Invalid transaction hash. Must be 66 characters starting with 0x.")]
    InvalidTransactionHash,

    #[error("Transaction not found.")]
    TransactionNotFound,
}

/// Liveness report for `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub api_key_loaded: bool,
}

impl HealthStatus {
    pub fn ok(api_key_loaded: bool) -> Self {
        Self {
            status: "ok",
            message: "Ethereum Explorer API is running",
            api_key_loaded,
        }
    }
}

/// Result of a wallet lookup.
#[derive(Debug, Clone, Serialize)]
pub struct WalletSummary {
    /// Null when the balance call failed.
    pub eth_balance: Option<f64>,
    pub is_contract: bool,
    pub transactions: Vec<WalletTransaction>,
    pub token_balances: TokenBalances,
}

/// One entry of a wallet's recent activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletTransaction {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value_eth: f64,
    pub block: Option<String>,
    pub timestamp: Option<String>,
    pub is_outgoing: bool,
}

/// Token symbol → balance, serialized as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenBalances(Vec<(String, f64)>);

impl TokenBalances {
    pub fn insert(&mut self, symbol: impl Into<String>, balance: f64) {
        self.0.push((symbol.into(), balance));
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.0.iter().find(|(s, _)| s == symbol).map(|(_, b)| *b)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TokenBalances {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (symbol, balance) in &self.0 {
            map.serialize_entry(symbol, balance)?;
        }
        map.end()
    }
}

/// Receipt-derived execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
}

/// Result of a transaction lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: String,
    pub value_eth: f64,
    pub value_wei: u128,
    /// Null while pending.
    pub block: Option<u64>,
    pub gas_limit: u64,
    pub gas_price_gwei: f64,
    pub input_data: String,
    pub method_id: Option<String>,
    /// The three fields below stay null when no receipt was obtained.
    pub status: Option<TxStatus>,
    pub gas_used: Option<u64>,
    pub gas_cost_eth: Option<f64>,
}
