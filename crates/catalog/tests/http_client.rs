//! Integration tests for the HTTP catalog client against a stub catalog server.

use std::time::Duration;

use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use catalog::{CatalogClient, CatalogError, HttpCatalogClient};
use common::ProductId;
use serde_json::json;

async fn product(Path(id): Path<u64>) -> impl IntoResponse {
    match id {
        1 => (
            StatusCode::OK,
            Json(json!({"id": 1, "title": "Running shoe", "price": 179.9, "image": "shoe.jpg"})),
        ),
        2 => (StatusCode::OK, Json(json!({"title": "No id here"}))),
        3 => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        _ => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn stock(Path(id): Path<u64>) -> impl IntoResponse {
    match id {
        1 => (StatusCode::OK, Json(json!({"id": 1, "amount": 3}))).into_response(),
        2 => (StatusCode::OK, "not json").into_response(),
        4 => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            (StatusCode::OK, Json(json!({"id": 4, "amount": 1}))).into_response()
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

/// Starts the stub catalog on an ephemeral port and returns its base URL.
async fn start_stub() -> String {
    let app = Router::new()
        .route("/products/{id}", get(product))
        .route("/stock/{id}", get(stock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

async fn client(timeout: Duration) -> HttpCatalogClient {
    let base_url = start_stub().await;
    HttpCatalogClient::new(base_url, timeout).unwrap()
}

#[tokio::test]
async fn fetches_product_record() {
    let client = client(Duration::from_secs(5)).await;

    let product = client.get_product(ProductId::new(1)).await.unwrap();

    assert_eq!(product.id, ProductId::new(1));
    assert_eq!(product.amount, 0);
    assert_eq!(product.title(), Some("Running shoe"));
    assert_eq!(product.price(), Some(179.9));
    assert_eq!(product.image(), Some("shoe.jpg"));
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let client = client(Duration::from_secs(5)).await;

    let err = client.get_product(ProductId::new(42)).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(id) if id == ProductId::new(42)));
}

#[tokio::test]
async fn record_without_id_is_unidentifiable() {
    let client = client(Duration::from_secs(5)).await;

    let err = client.get_product(ProductId::new(2)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Unidentifiable(_)));
}

#[tokio::test]
async fn server_error_is_reported_as_status() {
    let client = client(Duration::from_secs(5)).await;

    let err = client.get_product(ProductId::new(3)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Status(500)));
}

#[tokio::test]
async fn fetches_stock_level() {
    let client = client(Duration::from_secs(5)).await;

    let stock = client.get_stock(ProductId::new(1)).await.unwrap();
    assert_eq!(stock.amount, 3);
    assert_eq!(stock.id, Some(ProductId::new(1)));
}

#[tokio::test]
async fn undecodable_stock_is_an_error() {
    let client = client(Duration::from_secs(5)).await;

    let err = client.get_stock(ProductId::new(2)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Decode(_)));
}

#[tokio::test]
async fn slow_catalog_times_out() {
    let client = client(Duration::from_millis(200)).await;

    let err = client.get_stock(ProductId::new(4)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Timeout));
}

#[tokio::test]
async fn unreachable_catalog_is_a_transport_error() {
    // Bind and drop a listener to get a port nothing is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpCatalogClient::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = client.get_stock(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport(_)));
}
