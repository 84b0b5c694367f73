//! Upstream data provider client with pacing, timeout and error handling.
//!
//! # Responsibilities
//! - Inject the chain identifier and API credential into every call
//! - Wait on the injected `Pacer` before every call
//! - Issue one GET per call with a fixed timeout, never retrying
//! - Normalize transport, status and decode failures into `UpstreamError`
//! - Decode the handful of actions the explorer uses into typed results

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::U256;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{UpstreamConfig, CHAIN_ID};
use crate::observability::metrics;
use crate::units;
use crate::upstream::pacing::Pacer;
use crate::upstream::types::{
    AccountTransaction, ContractSource, Envelope, Query, RpcReceipt, RpcTransaction,
    UpstreamError, UpstreamResult,
};

/// Client for the upstream multi-chain explorer API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: url::Url,
    api_key: Option<String>,
    pacer: Arc<Pacer>,
    timeout_secs: u64,
}

impl UpstreamClient {
    /// Create a client whose pacer is derived from `config`.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        Self::with_pacer(config, Arc::new(Pacer::from_config(config)))
    }

    /// Create a client sharing an existing pacer.
    pub fn with_pacer(config: &UpstreamConfig, pacer: Arc<Pacer>) -> UpstreamResult<Self> {
        let base_url = url::Url::parse(&config.base_url).map_err(|e| {
            UpstreamError::Transport(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Transport(e.without_url().to_string()))?;

        tracing::info!(
            base_url = %base_url,
            api_key_loaded = config.has_api_key(),
            pacing = ?pacer.mode(),
            interval_ms = pacer.interval().as_millis() as u64,
            "Upstream client initialized"
        );

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            pacer,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Perform one paced upstream call and return the decoded JSON body.
    pub async fn call(&self, query: Query) -> UpstreamResult<Value> {
        self.call_with(query, Ok).await
    }

    /// Perform one paced upstream call and turn its body into `T`.
    ///
    /// The log entry and the call metric reflect the outcome of `extract`
    /// as well as the transport.
    async fn call_with<T, F>(&self, query: Query, extract: F) -> UpstreamResult<T>
    where
        F: FnOnce(Value) -> UpstreamResult<T>,
    {
        let module = query.module();
        let action = query.action();
        let pairs = query.into_pairs(CHAIN_ID, self.api_key.as_deref());

        self.pacer.wait().await;

        let start = Instant::now();
        let result = self.send(&pairs).await.and_then(extract);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::debug!(module, action, elapsed_ms, "Upstream call succeeded"),
            Err(UpstreamError::NoData) => {
                tracing::debug!(module, action, elapsed_ms, "Upstream call returned no data")
            }
            Err(e) => {
                tracing::warn!(module, action, elapsed_ms, error = %e, "Upstream call failed")
            }
        }
        metrics::record_upstream_call(action, outcome(&result), start);

        result
    }

    async fn send(&self, pairs: &[(&'static str, String)]) -> UpstreamResult<Value> {
        let response = self
            .http
            .get(self.base_url.clone())
            .query(pairs)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| self.classify(e))
    }

    // The request URL carries the API key, so it is stripped before display.
    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            UpstreamError::Decode(err.without_url().to_string())
        } else {
            UpstreamError::Transport(err.without_url().to_string())
        }
    }

    /// Native balance in wei.
    pub async fn get_balance(&self, address: &str) -> UpstreamResult<U256> {
        self.call_with(Query::balance(address), |body| decimal_result(&success_result(body)?))
            .await
    }

    /// Whether `address` has verified source code.
    pub async fn is_contract(&self, address: &str) -> UpstreamResult<bool> {
        self.call_with(Query::source_code(address), |body| {
            let sources: Vec<ContractSource> = decode(success_result(body)?)?;
            Ok(sources.first().is_some_and(|s| !s.source_code.is_empty()))
        })
        .await
    }

    /// Most recent normal transactions, newest first.
    pub async fn get_transactions(
        &self,
        address: &str,
        page: u32,
        offset: u32,
    ) -> UpstreamResult<Vec<AccountTransaction>> {
        self.call_with(Query::transactions(address, page, offset), |body| {
            decode(success_result(body)?)
        })
        .await
    }

    /// Raw ERC-20 balance (token base units).
    pub async fn get_token_balance(&self, contract: &str, address: &str) -> UpstreamResult<U256> {
        self.call_with(Query::token_balance(contract, address), |body| {
            decimal_result(&success_result(body)?)
        })
        .await
    }

    /// Transaction by hash. `NoData` when the provider has no record.
    pub async fn get_transaction(&self, hash: &str) -> UpstreamResult<RpcTransaction> {
        self.call_with(Query::transaction_by_hash(hash), |body| decode(rpc_result(body)?))
            .await
    }

    /// Receipt by transaction hash. `NoData` while pending or unknown.
    pub async fn get_transaction_receipt(&self, hash: &str) -> UpstreamResult<RpcReceipt> {
        self.call_with(Query::transaction_receipt(hash), |body| decode(rpc_result(body)?))
            .await
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key_loaded", &self.has_api_key())
            .field("timeout_secs", &self.timeout_secs)
            .field("pacer", &self.pacer)
            .finish()
    }
}

/// Label recorded in the `outcome` dimension of the upstream call metric.
fn outcome<T>(result: &UpstreamResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> UpstreamResult<T> {
    serde_json::from_value(value).map_err(|e| UpstreamError::Decode(e.to_string()))
}

/// `result` of an `account`/`contract` call that reported success.
fn success_result(body: Value) -> UpstreamResult<Value> {
    decode::<Envelope>(body)?.into_success()
}

/// `result` of a `proxy` call that returned an object.
fn rpc_result(body: Value) -> UpstreamResult<Value> {
    decode::<Envelope>(body)?.into_rpc_object()
}

fn decimal_result(result: &Value) -> UpstreamResult<U256> {
    let raw = result.as_str().ok_or_else(|| {
        UpstreamError::Decode(format!("expected decimal string, got {}", result))
    })?;
    units::parse_decimal(raw).map_err(|e| UpstreamError::Decode(e.to_string()))
}
