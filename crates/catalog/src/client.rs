use async_trait::async_trait;
use common::{Product, ProductId, Stock};

use crate::Result;

/// Read access to the remote product catalog.
///
/// Implementations must return either a complete record or an error. A
/// record that does not carry the requested id is an error, not data.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches the product record for display and cart insertion.
    async fn get_product(&self, product_id: ProductId) -> Result<Product>;

    /// Fetches the current stock level for a product.
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock>;
}

#[async_trait]
impl<T: CatalogClient + ?Sized> CatalogClient for std::sync::Arc<T> {
    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        (**self).get_product(product_id).await
    }

    async fn get_stock(&self, product_id: ProductId) -> Result<Stock> {
        (**self).get_stock(product_id).await
    }
}
