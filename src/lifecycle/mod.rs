//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Trigger → broadcast to server → stop accepting → drain → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: config and bind errors at startup are fatal
//! - In-flight lookups finish before the process exits

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
