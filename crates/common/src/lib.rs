//! Shared types used by the catalog client, the durable store and the cart engine.

pub mod types;

pub use types::{Product, ProductId, Stock};
