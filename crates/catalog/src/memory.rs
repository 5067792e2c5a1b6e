//! In-memory catalog for tests and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use common::{Product, ProductId, Stock};

use crate::client::CatalogClient;
use crate::error::{CatalogError, Result};

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, u32>,
    fail_requests: bool,
    latency: Option<Duration>,
}

/// In-memory catalog with seeded products and stock levels.
///
/// Clones share state, so a test can keep a handle and adjust stock while
/// an engine owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
    product_calls: Arc<AtomicUsize>,
    stock_calls: Arc<AtomicUsize>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product record with the given stock level.
    pub fn with_product(self, product: Product, stock: u32) -> Self {
        self.insert_product(product, stock);
        self
    }

    /// Inserts or replaces a product record and its stock level.
    pub fn insert_product(&self, product: Product, stock: u32) {
        let mut state = self.write();
        state.stock.insert(product.id, stock);
        state.products.insert(product.id, product);
    }

    /// Sets the stock level for a product, whether or not its record exists.
    pub fn set_stock(&self, product_id: ProductId, amount: u32) {
        self.write().stock.insert(product_id, amount);
    }

    /// Removes the stock entry for a product so stock lookups report not-found.
    pub fn clear_stock(&self, product_id: ProductId) {
        self.write().stock.remove(&product_id);
    }

    /// Makes every subsequent request fail as if the catalog were unreachable.
    pub fn set_fail_requests(&self, fail: bool) {
        self.write().fail_requests = fail;
    }

    /// Delays every subsequent request by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.write().latency = latency;
    }

    /// Returns how many product lookups have been made.
    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    /// Returns how many stock lookups have been made.
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    /// Returns the total number of lookups made.
    pub fn total_calls(&self) -> usize {
        self.product_calls() + self.stock_calls()
    }

    fn read(&self) -> RwLockReadGuard<'_, InMemoryCatalogState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, InMemoryCatalogState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    async fn before_request(&self) -> Result<()> {
        let (latency, fail) = {
            let state = self.read();
            (state.latency, state.fail_requests)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if fail {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.before_request().await?;

        self.read()
            .products
            .get(&product_id)
            .cloned()
            .ok_or(CatalogError::NotFound(product_id))
    }

    async fn get_stock(&self, product_id: ProductId) -> Result<Stock> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        self.before_request().await?;

        self.read()
            .stock
            .get(&product_id)
            .map(|amount| Stock::new(product_id, *amount))
            .ok_or(CatalogError::NotFound(product_id))
    }
}
