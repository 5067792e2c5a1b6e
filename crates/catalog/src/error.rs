use common::ProductId;
use thiserror::Error;

/// Errors returned by catalog lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no record for the product.
    #[error("Product not found in catalog: {0}")]
    NotFound(ProductId),

    /// The catalog answered with a record that does not identify the requested product.
    #[error("Catalog returned an unidentifiable record for product {0}")]
    Unidentifiable(ProductId),

    /// The request did not complete within the configured timeout.
    #[error("Catalog request timed out")]
    Timeout,

    /// The request could not be sent or the connection failed.
    #[error("Catalog transport error: {0}")]
    Transport(String),

    /// The catalog answered with an unexpected HTTP status.
    #[error("Catalog responded with status {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("Catalog response could not be decoded: {0}")]
    Decode(String),

    /// The catalog is unavailable.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Returns true if the catalog positively reported the product as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
