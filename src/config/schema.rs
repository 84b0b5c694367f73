//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the explorer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Chain identifier sent with every upstream call (Ethereum mainnet).
pub const CHAIN_ID: &str = "1";

/// Root configuration for the explorer service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Upstream data provider settings.
    pub upstream: UpstreamConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Token contracts checked on wallet lookups, in output order.
    pub tokens: TokenRegistry,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ExplorerConfig {
    /// Socket address string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.bind_host, self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub bind_host: String,

    /// TCP port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// How upstream calls are spaced out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PacingMode {
    /// Sleep a fixed interval before every call. Concurrent requests are not
    /// coordinated, so the aggregate rate grows with concurrency.
    #[default]
    PerCall,
    /// One process-wide schedule shared by every request.
    Shared,
}

impl std::str::FromStr for PacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_call" | "per-call" | "fixed" => Ok(Self::PerCall),
            "shared" => Ok(Self::Shared),
            other => Err(format!("unknown pacing mode '{}'", other)),
        }
    }
}

/// Upstream data provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base endpoint all calls are sent to.
    pub base_url: String,

    /// API credential. Calls are made anonymously when absent.
    pub api_key: Option<String>,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,

    /// Delay between calls when a credential is configured.
    pub keyed_interval_ms: u64,

    /// Delay between calls without a credential.
    pub anonymous_interval_ms: u64,

    /// Pacing strategy.
    pub pacing: PacingMode,
}

impl UpstreamConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Interval applied before each call, depending on whether a key is loaded.
    pub fn pacing_interval_ms(&self) -> u64 {
        if self.has_api_key() {
            self.keyed_interval_ms
        } else {
            self.anonymous_interval_ms
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.etherscan.io/v2/api".to_string(),
            api_key: None,
            timeout_secs: 10,
            keyed_interval_ms: 200,
            anonymous_interval_ms: 5000,
            pacing: PacingMode::PerCall,
        }
    }
}

// Keeps the credential out of logs.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key_loaded", &self.has_api_key())
            .field("timeout_secs", &self.timeout_secs)
            .field("keyed_interval_ms", &self.keyed_interval_ms)
            .field("anonymous_interval_ms", &self.anonymous_interval_ms)
            .field("pacing", &self.pacing)
            .finish()
    }
}

/// Cross-origin access policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// A single tracked ERC-20 contract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenEntry {
    pub symbol: String,
    pub address: String,
}

impl TokenEntry {
    fn new(symbol: &str, address: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            address: address.to_string(),
        }
    }
}

/// Ordered, read-only set of tokens checked for every wallet.
///
/// Balances are always scaled by 18 decimals; tokens such as USDC (6 decimals)
/// are therefore reported far too small.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TokenRegistry(Vec<TokenEntry>);

impl TokenRegistry {
    pub fn new(entries: Vec<TokenEntry>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self(vec![
            TokenEntry::new("USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            TokenEntry::new("DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F"),
            TokenEntry::new("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            TokenEntry::new("UNI", "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984"),
        ])
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for handling one inbound request, in seconds.
    /// Anonymous wallet lookups pace seven upstream calls at 5s each.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 120 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
