//! Durable storage for the serialized cart.
//!
//! The store is a key-value layer: the whole cart is serialized into one
//! payload and saved under a single well-known key. Each `save` overwrites
//! the previous payload; there is no incremental persistence.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod sqlite;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryCartStore;
pub use postgres::PostgresCartStore;
pub use sqlite::SqliteCartStore;
pub use store::CartStore;

/// Default key the cart is stored under.
pub const DEFAULT_CART_KEY: &str = "@storefront:cart";
