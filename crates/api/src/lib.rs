//! HTTP API server with observability for the cart engine.
//!
//! Exposes the cart over REST, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use cart::CartEngine;
use cart_store::{
    CartStore, InMemoryCartStore, PostgresCartStore, SqliteCartStore, StoreError,
};
use catalog::CatalogClient;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::cart::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, S>(state: Arc<AppState<C, S>>, metrics_handle: PrometheusHandle) -> Router
where
    C: CatalogClient + 'static,
    S: CartStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<C, S>))
        .route("/cart", get(routes::cart::get::<C, S>))
        .route("/cart/items", post(routes::cart::add::<C, S>))
        .route(
            "/cart/items/{id}",
            put(routes::cart::update::<C, S>).delete(routes::cart::remove::<C, S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Restores the cart saved under `key` and wraps the engine in shared state.
pub async fn create_state<C, S>(catalog: C, store: S, key: &str) -> Arc<AppState<C, S>>
where
    C: CatalogClient,
    S: CartStore,
{
    let engine = CartEngine::load(catalog, store, key).await;
    Arc::new(AppState { engine })
}

/// Opens the cart store selected by `database_url`.
///
/// `postgres://` URLs get migrations applied, `sqlite:` URLs get the table
/// created, and no URL keeps the cart in process memory.
pub async fn connect_store(database_url: Option<&str>) -> Result<Arc<dyn CartStore>, StoreError> {
    match database_url {
        Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
            let store = PostgresCartStore::connect(url).await?;
            store.run_migrations().await?;
            tracing::info!("using PostgreSQL cart store");
            Ok(Arc::new(store))
        }
        Some(url) if url.starts_with("sqlite:") => {
            let store = SqliteCartStore::connect(url).await?;
            tracing::info!("using SQLite cart store");
            Ok(Arc::new(store))
        }
        Some(url) => {
            let scheme = url.split(':').next().unwrap_or_default();
            Err(StoreError::Unavailable(format!(
                "unsupported database URL scheme: {scheme}"
            )))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, the cart will not survive a restart");
            Ok(Arc::new(InMemoryCartStore::new()))
        }
    }
}
