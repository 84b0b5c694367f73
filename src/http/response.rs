//! Error responses.
//!
//! Maps `ApiError` to a status code and a `{"error": "..."}` JSON body.
//! Upstream failures never reach this layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::explorer::ApiError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidAddress | ApiError::InvalidTransactionHash => StatusCode::BAD_REQUEST,
            ApiError::TransactionNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
