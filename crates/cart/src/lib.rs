//! Cart engine.
//!
//! This crate owns the shopping cart and the rules for changing it:
//! - [`Cart`]: an ordered, id-unique list of products with positive amounts
//! - [`CartEngine`]: add, remove and re-quantify products, validating against
//!   the catalog and writing every accepted change through to the store
//! - [`CartError`] and [`Mutation`]: the explicit outcome of every operation

pub mod cart;
pub mod engine;
pub mod error;

pub use cart::{Cart, SnapshotError};
pub use common::{Product, ProductId, Stock};
pub use engine::{CartEngine, Mutation};
pub use error::CartError;
