//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart::CartError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// A cart operation was rejected.
    Cart(CartError),
}

impl ApiError {
    /// Returns the HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Cart(err) => cart_error_status(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BadRequest(msg) => serde_json::json!({ "error": msg }),
            ApiError::Cart(err) => {
                if status.is_server_error() {
                    tracing::warn!(error = %err, kind = err.kind(), "cart dependency failed");
                }
                serde_json::json!({
                    "error": err.user_message(),
                    "kind": err.kind(),
                    "detail": err.to_string(),
                })
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn cart_error_status(err: &CartError) -> StatusCode {
    match err {
        CartError::ProductAddition { source, .. } if source.is_not_found() => {
            StatusCode::NOT_FOUND
        }
        CartError::ProductAddition { .. } => StatusCode::BAD_GATEWAY,
        CartError::ProductRemoval { .. } | CartError::ProductUpdate { .. } => {
            StatusCode::NOT_FOUND
        }
        CartError::OutOfStock { .. } => StatusCode::CONFLICT,
        CartError::StockUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}
