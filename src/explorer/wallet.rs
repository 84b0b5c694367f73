//! Wallet lookup: balance, account type, recent activity and token holdings.
//!
//! Every upstream call runs sequentially and degrades on its own: a failed
//! balance becomes null, failed activity becomes an empty list, and a failed
//! token call drops that token.

use crate::config::TokenRegistry;
use crate::explorer::query::AddressQuery;
use crate::explorer::types::{TokenBalances, WalletSummary, WalletTransaction};
use crate::units;
use crate::upstream::types::AccountTransaction;
use crate::upstream::UpstreamClient;

/// Number of recent transactions fetched per wallet.
pub const RECENT_TX_LIMIT: u32 = 10;

/// Decimal places kept for token balances.
const TOKEN_PRECISION: usize = 6;

pub async fn lookup_wallet(
    client: &UpstreamClient,
    tokens: &TokenRegistry,
    address: &AddressQuery,
) -> WalletSummary {
    let eth_balance = client
        .get_balance(address.as_str())
        .await
        .ok()
        .map(units::wei_to_ether);

    let is_contract = client.is_contract(address.as_str()).await.unwrap_or(false);

    let transactions = client
        .get_transactions(address.as_str(), 1, RECENT_TX_LIMIT)
        .await
        .map(|txs| summarize_transactions(txs, address))
        .unwrap_or_default();

    let mut token_balances = TokenBalances::default();
    for token in tokens.iter() {
        match client.get_token_balance(&token.address, address.as_str()).await {
            Ok(raw) => {
                let balance = units::scale_down(raw, units::TOKEN_DECIMALS);
                add_token_balance(&mut token_balances, &token.symbol, balance);
            }
            Err(e) => {
                tracing::warn!(symbol = %token.symbol, error = %e, "Token balance unavailable")
            }
        }
    }

    tracing::info!(
        address = %address.as_str(),
        eth_balance_known = eth_balance.is_some(),
        is_contract,
        transactions = transactions.len(),
        tokens_held = token_balances.len(),
        "Wallet lookup complete"
    );

    WalletSummary {
        eth_balance,
        is_contract,
        transactions,
        token_balances,
    }
}

/// Flatten upstream activity, marking entries sent by `address`.
pub fn summarize_transactions(
    raw: Vec<AccountTransaction>,
    address: &AddressQuery,
) -> Vec<WalletTransaction> {
    raw.into_iter()
        .map(|tx| {
            let value_eth = match tx.value.as_deref().map(units::parse_decimal) {
                None => 0.0,
                Some(Ok(wei)) => units::wei_to_ether(wei),
                Some(Err(e)) => {
                    tracing::warn!(hash = ?tx.hash, error = %e, "Unparseable transaction value");
                    0.0
                }
            };
            let is_outgoing = address.matches(tx.from.as_deref().unwrap_or_default());

            WalletTransaction {
                hash: tx.hash,
                from: tx.from,
                to: tx.to,
                value_eth,
                block: tx.block_number,
                timestamp: tx.timestamp,
                is_outgoing,
            }
        })
        .collect()
}

/// Record `balance` under `symbol` when it is strictly positive.
///
/// The positivity check runs before rounding, so dust below the precision
/// shows up as `0.0`.
pub fn add_token_balance(balances: &mut TokenBalances, symbol: &str, balance: f64) {
    if balance > 0.0 {
        balances.insert(symbol, units::round_to(balance, TOKEN_PRECISION));
    }
}
