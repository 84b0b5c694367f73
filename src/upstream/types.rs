//! Upstream request/response types and error definitions.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to the upstream provider.
///
/// Handlers collapse every variant into "field unavailable"; the variants
/// exist so logs and metrics can tell an outage from an empty answer.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection or request failed before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// No response within the configured timeout.
    #[error("upstream timeout after {0} seconds")]
    Timeout(u64),

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {0}")]
    Status(u16),

    /// Body was not the JSON shape expected for the action.
    #[error("malformed upstream response: {0}")]
    Decode(String),

    /// Upstream answered but reported a non-success status.
    #[error("upstream rejected request: {0}")]
    Rejected(String),

    /// Upstream answered successfully with an empty result.
    #[error("upstream returned no data")]
    NoData,
}

impl UpstreamError {
    /// Short label used for the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Status(_) => "status",
            UpstreamError::Decode(_) => "decode",
            UpstreamError::Rejected(_) => "rejected",
            UpstreamError::NoData => "no_data",
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// One upstream call: module, action and the action-specific parameters.
///
/// `chainid` and `apikey` are added by the client, never by callers.
#[derive(Debug, Clone)]
pub struct Query {
    module: &'static str,
    action: &'static str,
    params: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new(module: &'static str, action: &'static str) -> Self {
        Self {
            module,
            action,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    /// Native balance of `address` at the latest block.
    pub fn balance(address: &str) -> Self {
        Self::new("account", "balance")
            .param("address", address)
            .param("tag", "latest")
    }

    /// Verified source code for `address`; empty for EOAs.
    pub fn source_code(address: &str) -> Self {
        Self::new("contract", "getsourcecode").param("address", address)
    }

    /// Normal transactions involving `address`, newest first.
    pub fn transactions(address: &str, page: u32, offset: u32) -> Self {
        Self::new("account", "txlist")
            .param("address", address)
            .param("sort", "desc")
            .param("page", page.to_string())
            .param("offset", offset.to_string())
    }

    /// ERC-20 balance of `address` in the token at `contract`.
    pub fn token_balance(contract: &str, address: &str) -> Self {
        Self::new("account", "tokenbalance")
            .param("contractaddress", contract)
            .param("address", address)
            .param("tag", "latest")
    }

    pub fn transaction_by_hash(hash: &str) -> Self {
        Self::new("proxy", "eth_getTransactionByHash").param("txhash", hash)
    }

    pub fn transaction_receipt(hash: &str) -> Self {
        Self::new("proxy", "eth_getTransactionReceipt").param("txhash", hash)
    }

    /// Full parameter list sent on the wire.
    pub fn into_pairs(self, chain_id: &str, api_key: Option<&str>) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(self.params.len() + 4);
        pairs.push(("module", self.module.to_string()));
        pairs.push(("action", self.action.to_string()));
        pairs.extend(self.params);
        pairs.push(("chainid", chain_id.to_string()));
        if let Some(key) = api_key {
            pairs.push(("apikey", key.to_string()));
        }
        pairs
    }
}

/// Envelope used by the `account` and `contract` modules.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Value,
}

impl Envelope {
    /// Unwrap `result` when `status == "1"`.
    pub fn into_success(self) -> UpstreamResult<Value> {
        if self.status.as_deref() == Some("1") {
            Ok(self.result)
        } else {
            let reason = self
                .message
                .or_else(|| self.result.as_str().map(String::from))
                .unwrap_or_else(|| "unknown error".to_string());
            Err(UpstreamError::Rejected(reason))
        }
    }

    /// Unwrap `result` of a `proxy` (JSON-RPC passthrough) call, which carries
    /// no status field. Anything other than a JSON object counts as no data.
    pub fn into_rpc_object(self) -> UpstreamResult<Value> {
        match self.result {
            Value::Object(map) if !map.is_empty() => Ok(Value::Object(map)),
            Value::Null | Value::Object(_) => Err(UpstreamError::NoData),
            Value::String(s) if self.status.as_deref() == Some("0") => {
                Err(UpstreamError::Rejected(s))
            }
            _ => Err(UpstreamError::NoData),
        }
    }
}

/// Entry of `account/txlist`. Numbers arrive as decimal strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTransaction {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub block_number: Option<String>,
    #[serde(rename = "timeStamp")]
    pub timestamp: Option<String>,
}

/// Entry of `contract/getsourcecode`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractSource {
    #[serde(rename = "SourceCode", default)]
    pub source_code: String,
}

/// Result of `eth_getTransactionByHash`. Quantities are hex strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub gas: Option<String>,
    pub gas_price: Option<String>,
    /// Absent or null while the transaction is pending.
    pub block_number: Option<String>,
    pub input: Option<String>,
}

/// Result of `eth_getTransactionReceipt`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub status: Option<String>,
    pub gas_used: Option<String>,
}
