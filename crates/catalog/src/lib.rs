//! Remote catalog client.
//!
//! The cart engine asks the catalog for two things: a product record when a
//! product enters the cart, and the current stock level whenever a quantity
//! changes. Any failure is reported as a [`CatalogError`]; callers never see
//! partial data.

pub mod client;
pub mod error;
pub mod http;
pub mod memory;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use http::HttpCatalogClient;
pub use memory::InMemoryCatalog;
