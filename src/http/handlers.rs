//! Route handlers.

use std::time::Instant;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::explorer::{self, AddressQuery, HealthStatus, TxHashQuery};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Liveness check for `GET /`. Never calls upstream.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus::ok(state.client.has_api_key()))
}

/// Wallet summary for `GET /api/wallet/{address}`.
pub async fn wallet_lookup(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Response {
    let start = Instant::now();

    let response = match AddressQuery::parse(&address) {
        Ok(query) => {
            let summary = explorer::lookup_wallet(&state.client, &state.tokens, &query).await;
            Json(summary).into_response()
        }
        Err(e) => {
            tracing::warn!(address = %address, "Rejected malformed address");
            e.into_response()
        }
    };

    metrics::record_request("wallet", response.status().as_u16(), start);
    response
}

/// Transaction details for `GET /api/transaction/{hash}`.
pub async fn transaction_lookup(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Response {
    let start = Instant::now();

    let response = match TxHashQuery::parse(&hash) {
        Ok(query) => match explorer::lookup_transaction(&state.client, &query).await {
            Ok(summary) => Json(summary).into_response(),
            Err(e) => e.into_response(),
        },
        Err(e) => {
            tracing::warn!(hash = %hash, "Rejected malformed transaction hash");
            e.into_response()
        }
    };

    metrics::record_request("transaction", response.status().as_u16(), start);
    response
}
