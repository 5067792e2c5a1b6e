//! Cart error types.

use catalog::CatalogError;
use common::ProductId;
use thiserror::Error;

/// Errors returned by cart operations.
///
/// Every variant leaves the cart and the store exactly as they were.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product record could not be fetched from the catalog.
    #[error("Could not add product {product_id}: {source}")]
    ProductAddition {
        product_id: ProductId,
        source: CatalogError,
    },

    /// The product to remove is not in the cart.
    #[error("Could not remove product {product_id}: not in cart")]
    ProductRemoval { product_id: ProductId },

    /// The product whose amount should change is not in the cart.
    #[error("Could not update product {product_id}: not in cart")]
    ProductUpdate { product_id: ProductId },

    /// The requested amount exceeds the available stock.
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// The stock level could not be determined.
    #[error("Stock of product {product_id} could not be determined: {source}")]
    StockUnavailable {
        product_id: ProductId,
        source: CatalogError,
    },
}

impl CartError {
    /// Returns the product the failed operation targeted.
    pub fn product_id(&self) -> ProductId {
        match self {
            CartError::ProductAddition { product_id, .. }
            | CartError::ProductRemoval { product_id }
            | CartError::ProductUpdate { product_id }
            | CartError::OutOfStock { product_id, .. }
            | CartError::StockUnavailable { product_id, .. } => *product_id,
        }
    }

    /// Returns a short machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CartError::ProductAddition { .. } => "product_addition",
            CartError::ProductRemoval { .. } => "product_removal",
            CartError::ProductUpdate { .. } => "product_update",
            CartError::OutOfStock { .. } => "out_of_stock",
            CartError::StockUnavailable { .. } => "stock_unavailable",
        }
    }

    /// Returns the notification shown to the shopper.
    ///
    /// An unknown stock level reads the same as an exceeded one.
    pub fn user_message(&self) -> &'static str {
        match self {
            CartError::ProductAddition { .. } => "Error adding product",
            CartError::ProductRemoval { .. } => "Error removing product",
            CartError::ProductUpdate { .. } => "Error changing product quantity",
            CartError::OutOfStock { .. } | CartError::StockUnavailable { .. } => {
                "Requested quantity out of stock"
            }
        }
    }
}
