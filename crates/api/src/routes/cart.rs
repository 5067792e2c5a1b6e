//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use cart::{Cart, CartEngine, Mutation, Product, ProductId};
use cart_store::CartStore;
use catalog::CatalogClient;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Warning attached to a mutation whose cart could not be persisted.
pub const UNSAVED_WARNING: &str = "Could not save cart";

/// Shared application state accessible from all handlers.
pub struct AppState<C, S> {
    pub engine: CartEngine<C, S>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct AddProductRequest {
    pub product_id: u64,
}

#[derive(Deserialize)]
pub struct UpdateAmountRequest {
    pub amount: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<Product>,
    pub distinct_products: usize,
    pub total_quantity: u64,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            distinct_products: cart.len(),
            total_quantity: cart.total_quantity(),
        }
    }
}

#[derive(Serialize)]
pub struct MutationResponse {
    pub outcome: &'static str,
    pub cart: CartResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

impl MutationResponse {
    fn new(outcome: &Mutation, cart: &Cart) -> Self {
        let warning = match outcome {
            Mutation::Unsaved { .. } => Some(UNSAVED_WARNING),
            Mutation::Saved | Mutation::Ignored => None,
        };
        Self {
            outcome: outcome.as_str(),
            cart: CartResponse::from(cart),
            warning,
        }
    }
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse::<u64>()
        .map(ProductId::new)
        .map_err(|_| ApiError::BadRequest(format!("Invalid product id: {raw}")))
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn respond<C, S>(state: &AppState<C, S>, outcome: &Mutation) -> Json<MutationResponse>
where
    C: CatalogClient,
    S: CartStore,
{
    let cart = state.engine.snapshot();
    Json(MutationResponse::new(outcome, &cart))
}

// -- Handlers --

/// GET /cart: returns the current cart.
pub async fn get<C, S>(State(state): State<Arc<AppState<C, S>>>) -> Json<CartResponse>
where
    C: CatalogClient + 'static,
    S: CartStore + 'static,
{
    let cart = state.engine.snapshot();
    Json(CartResponse::from(cart.as_ref()))
}

/// POST /cart/items: adds a product, or increments it if already present.
#[tracing::instrument(skip(state, payload))]
pub async fn add<C, S>(
    State(state): State<Arc<AppState<C, S>>>,
    payload: Result<Json<AddProductRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, ApiError>
where
    C: CatalogClient + 'static,
    S: CartStore + 'static,
{
    let req = parse_body(payload)?;
    let outcome = state
        .engine
        .add_product(ProductId::new(req.product_id))
        .await?;
    Ok(respond(&state, &outcome))
}

/// PUT /cart/items/{id}: sets the amount of a product in the cart.
#[tracing::instrument(skip(state, payload))]
pub async fn update<C, S>(
    State(state): State<Arc<AppState<C, S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAmountRequest>, JsonRejection>,
) -> Result<Json<MutationResponse>, ApiError>
where
    C: CatalogClient + 'static,
    S: CartStore + 'static,
{
    let product_id = parse_product_id(&id)?;
    let req = parse_body(payload)?;
    let outcome = state
        .engine
        .update_product_amount(product_id, req.amount)
        .await?;
    Ok(respond(&state, &outcome))
}

/// DELETE /cart/items/{id}: removes a product from the cart.
#[tracing::instrument(skip(state))]
pub async fn remove<C, S>(
    State(state): State<Arc<AppState<C, S>>>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, ApiError>
where
    C: CatalogClient + 'static,
    S: CartStore + 'static,
{
    let product_id = parse_product_id(&id)?;
    let outcome = state.engine.remove_product(product_id).await?;
    Ok(respond(&state, &outcome))
}
