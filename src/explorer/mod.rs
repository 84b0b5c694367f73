//! Explorer lookups.
//!
//! # Data Flow
//! ```text
//! path parameter
//!     → query.rs (format check, 400 on failure, no upstream call)
//!     → wallet.rs / transaction.rs (sequential upstream calls)
//!     → types.rs (flattened response shapes)
//! ```

pub mod query;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use query::{AddressQuery, TxHashQuery};
pub use transaction::lookup_transaction;
pub use types::{ApiError, HealthStatus, TransactionSummary, WalletSummary};
pub use wallet::lookup_wallet;
