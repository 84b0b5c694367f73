//! Ethereum explorer API.
//!
//! A thin HTTP façade over a third-party blockchain-data API: validates a
//! path parameter, makes a few paced upstream calls and returns a flattened
//! JSON summary.

pub mod config;
pub mod explorer;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod units;
pub mod upstream;

pub use config::ExplorerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
