//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use cart_store::CartStore;
use catalog::CatalogClient;
use serde::Serialize;

use super::cart::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cart_key: String,
    pub distinct_products: usize,
}

/// GET /health: reports liveness and the size of the cart being served.
pub async fn check<C, S>(State(state): State<Arc<AppState<C, S>>>) -> Json<HealthResponse>
where
    C: CatalogClient + 'static,
    S: CartStore + 'static,
{
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        cart_key: state.engine.key().to_string(),
        distinct_products: state.engine.snapshot().len(),
    })
}
