//! Upstream data provider subsystem.
//!
//! # Data Flow
//! ```text
//! handler builds Query (types.rs)
//!     → client.rs injects chainid / apikey
//!     → pacing.rs waits for a slot
//!     → one GET with timeout
//!     → UpstreamResult<T> (value, or the reason it is unavailable)
//! ```
//!
//! # Constraints
//! - No retries, no caching
//! - The API key is never logged
//! - Failures never propagate past the handlers as errors

pub mod client;
pub mod pacing;
pub mod types;

pub use client::UpstreamClient;
pub use pacing::Pacer;
pub use types::{Query, UpstreamError, UpstreamResult};
