//! Transaction lookup: details plus best-effort receipt.

use alloy::primitives::U256;

use crate::explorer::query::TxHashQuery;
use crate::explorer::types::{ApiError, TransactionSummary, TxStatus, CONTRACT_CREATION};
use crate::units;
use crate::upstream::types::{RpcReceipt, RpcTransaction};
use crate::upstream::UpstreamClient;

/// Length of `0x` plus a 4-byte selector.
const METHOD_ID_LEN: usize = 10;

/// Receipt status value of a successful execution.
const STATUS_SUCCESS: &str = "0x1";

pub async fn lookup_transaction(
    client: &UpstreamClient,
    hash: &TxHashQuery,
) -> Result<TransactionSummary, ApiError> {
    let tx = match client.get_transaction(hash.as_str()).await {
        Ok(tx) => tx,
        Err(e) => {
            tracing::info!(hash = %hash.as_str(), reason = %e, "Transaction not found");
            return Err(ApiError::TransactionNotFound);
        }
    };

    let receipt = match client.get_transaction_receipt(hash.as_str()).await {
        Ok(r) => Some(r),
        Err(e) => {
            tracing::debug!(hash = %hash.as_str(), reason = %e, "Receipt unavailable");
            None
        }
    };

    Ok(summarize_transaction(tx, receipt))
}

/// Assemble the summary from the raw transaction and optional receipt.
pub fn summarize_transaction(
    tx: RpcTransaction,
    receipt: Option<RpcReceipt>,
) -> TransactionSummary {
    let value = quantity_or_zero(tx.value.as_deref(), "value");
    let gas_limit = quantity_or_zero(tx.gas.as_deref(), "gas");
    let gas_price = quantity_or_zero(tx.gas_price.as_deref(), "gasPrice");
    let block = tx
        .block_number
        .as_deref()
        .filter(|b| !b.is_empty())
        .map(|b| quantity_or_zero(Some(b), "blockNumber"))
        .map(|b| narrow_u64(b, "blockNumber"));

    let input_data = tx.input.unwrap_or_else(|| "0x".to_string());
    let method_id = method_id(&input_data);

    let to = match tx.to {
        Some(to) if !to.is_empty() => to,
        _ => CONTRACT_CREATION.to_string(),
    };

    let (status, gas_used, gas_cost_eth) = match receipt {
        Some(receipt) => {
            let gas_used = quantity_or_zero(receipt.gas_used.as_deref(), "gasUsed");
            let status = if receipt.status.as_deref() == Some(STATUS_SUCCESS) {
                TxStatus::Success
            } else {
                TxStatus::Failed
            };
            let cost = gas_used.saturating_mul(gas_price);
            (
                Some(status),
                Some(narrow_u64(gas_used, "gasUsed")),
                Some(units::wei_to_ether(cost)),
            )
        }
        None => (None, None, None),
    };

    TransactionSummary {
        hash: tx.hash,
        from: tx.from,
        to,
        value_eth: units::wei_to_ether(value),
        value_wei: units::to_u128(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Transaction value exceeds u128");
            u128::MAX
        }),
        block,
        gas_limit: narrow_u64(gas_limit, "gas"),
        gas_price_gwei: units::wei_to_gwei(gas_price),
        input_data,
        method_id,
        status,
        gas_used,
        gas_cost_eth,
    }
}

/// First four bytes of calldata, when there is more than a bare selector's worth.
pub fn method_id(input: &str) -> Option<String> {
    if input.len() > METHOD_ID_LEN {
        input.get(..METHOD_ID_LEN).map(String::from)
    } else {
        None
    }
}

fn quantity_or_zero(raw: Option<&str>, field: &'static str) -> U256 {
    match raw {
        None => U256::ZERO,
        Some(s) => units::parse_quantity(s).unwrap_or_else(|e| {
            tracing::warn!(field, error = %e, "Unparseable quantity, using zero");
            U256::ZERO
        }),
    }
}

fn narrow_u64(value: U256, field: &'static str) -> u64 {
    units::to_u64(value).unwrap_or_else(|e| {
        tracing::warn!(field, error = %e, "Quantity exceeds u64");
        u64::MAX
    })
}
