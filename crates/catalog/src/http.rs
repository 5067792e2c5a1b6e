//! HTTP catalog client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::{Product, ProductId, Stock};
use reqwest::StatusCode;
use serde_json::Value;

use crate::client::CatalogClient;
use crate::error::{CatalogError, Result};

const PRODUCTS: &str = "products";
const STOCK: &str = "stock";

/// Catalog client speaking JSON over HTTP.
///
/// Expects `GET {base}/products/{id}` to return a product object and
/// `GET {base}/stock/{id}` to return `{"id": .., "amount": ..}`.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpCatalogClient {
    /// Creates a client for the catalog at `base_url`.
    ///
    /// Requests that take longer than `timeout` fail with [`CatalogError::Timeout`].
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Returns the catalog base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, endpoint: &'static str, product_id: ProductId) -> Result<Value> {
        let url = format!("{}/{}/{}", self.base_url, endpoint, product_id);
        let start = Instant::now();

        let result = self.request(&url, product_id).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::histogram!(
            "catalog_request_duration_seconds",
            "endpoint" => endpoint,
            "outcome" => outcome
        )
        .record(start.elapsed().as_secs_f64());

        match &result {
            Ok(_) => tracing::debug!(%url, "catalog request succeeded"),
            Err(e) => tracing::warn!(%url, error = %e, "catalog request failed"),
        }

        result
    }

    async fn request(&self, url: &str, product_id: ProductId) -> Result<Value> {
        let response = self.http.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(product_id));
        }
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout
            } else {
                CatalogError::Decode(e.to_string())
            }
        })
    }
}

fn transport_error(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Transport(e.to_string())
    }
}

/// Reads the `id` field of a catalog record, if it has a usable one.
fn record_id(body: &Value) -> Option<ProductId> {
    body.get("id").and_then(Value::as_u64).map(ProductId::new)
}

/// Decodes a product record, rejecting records that do not carry the requested id.
pub(crate) fn decode_product(product_id: ProductId, body: Value) -> Result<Product> {
    if record_id(&body) != Some(product_id) {
        return Err(CatalogError::Unidentifiable(product_id));
    }
    serde_json::from_value(body).map_err(|e| CatalogError::Decode(e.to_string()))
}

/// Decodes a stock record. A missing id is filled in from the request.
pub(crate) fn decode_stock(product_id: ProductId, body: Value) -> Result<Stock> {
    if let Some(id) = body.get("id")
        && !id.is_null()
        && record_id(&body) != Some(product_id)
    {
        return Err(CatalogError::Unidentifiable(product_id));
    }

    let mut stock: Stock =
        serde_json::from_value(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    stock.id = Some(product_id);
    Ok(stock)
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    #[tracing::instrument(skip(self), fields(catalog = %self.base_url))]
    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        let body = self.fetch(PRODUCTS, product_id).await?;
        decode_product(product_id, body)
    }

    #[tracing::instrument(skip(self), fields(catalog = %self.base_url))]
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock> {
        let body = self.fetch(STOCK, product_id).await?;
        decode_stock(product_id, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_product() {
        let product = decode_product(
            ProductId::new(1),
            json!({"id": 1, "title": "Shoe", "price": 179.9}),
        )
        .unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.amount, 0);
        assert_eq!(product.title(), Some("Shoe"));
    }

    #[test]
    fn test_decode_product_without_id() {
        let err = decode_product(ProductId::new(1), json!({"title": "Shoe"})).unwrap_err();
        assert!(matches!(err, CatalogError::Unidentifiable(_)));

        let err = decode_product(ProductId::new(1), json!({})).unwrap_err();
        assert!(matches!(err, CatalogError::Unidentifiable(_)));
    }

    #[test]
    fn test_decode_product_with_other_id() {
        let err = decode_product(ProductId::new(1), json!({"id": 2})).unwrap_err();
        assert!(matches!(err, CatalogError::Unidentifiable(id) if id == ProductId::new(1)));
    }

    #[test]
    fn test_decode_stock() {
        let stock = decode_stock(ProductId::new(4), json!({"amount": 3})).unwrap();
        assert_eq!(stock, Stock::new(ProductId::new(4), 3));

        let stock = decode_stock(ProductId::new(4), json!({"id": 4, "amount": 0})).unwrap();
        assert_eq!(stock.amount, 0);
    }

    #[test]
    fn test_decode_stock_rejects_garbage() {
        let err = decode_stock(ProductId::new(4), json!({"id": 5, "amount": 3})).unwrap_err();
        assert!(matches!(err, CatalogError::Unidentifiable(_)));

        let err = decode_stock(ProductId::new(4), json!({"amount": -1})).unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));

        let err = decode_stock(ProductId::new(4), json!({})).unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            HttpCatalogClient::new("http://localhost:3333/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3333");
    }
}
