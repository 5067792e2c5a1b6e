//! The cart value type.

use std::collections::HashSet;
use std::num::NonZeroU32;

use common::{Product, ProductId};
use serde::Serialize;
use thiserror::Error;

/// Reasons a serialized cart is not well-formed.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The payload is not a JSON array of product objects.
    #[error("Cart payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// The same product appears twice.
    #[error("Duplicate product in cart: {0}")]
    DuplicateProduct(ProductId),

    /// A product has a zero amount.
    #[error("Product {0} has zero amount")]
    ZeroAmount(ProductId),
}

/// An ordered collection of products, unique by id.
///
/// Position is fixed by the first insertion; amount changes edit the entry
/// where it is. Every amount is at least one. Transitions return a new cart
/// and leave `self` untouched, so a cart handed to readers never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from products, checking id uniqueness and positive amounts.
    pub fn from_products(items: Vec<Product>) -> Result<Self, SnapshotError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(SnapshotError::DuplicateProduct(item.id));
            }
            if item.amount == 0 {
                return Err(SnapshotError::ZeroAmount(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Decodes a cart from its stored JSON form.
    pub fn from_json(payload: &str) -> Result<Self, SnapshotError> {
        let items: Vec<Product> = serde_json::from_str(payload)?;
        Self::from_products(items)
    }

    /// Encodes the cart into its stored JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Returns the entry for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|item| item.id == product_id)
    }

    /// Returns true if the product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Returns the entries in insertion order.
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.items.iter()
    }

    /// Returns the number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart holds nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the sum of all amounts.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Returns a cart with `product` appended at amount one.
    ///
    /// The caller must have checked that the product is absent.
    pub(crate) fn with_added(&self, mut product: Product) -> Self {
        debug_assert!(!self.contains(product.id));
        product.amount = 1;

        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(product);
        Self { items }
    }

    /// Returns a cart without `product_id`, or None if it is absent.
    pub(crate) fn without(&self, product_id: ProductId) -> Option<Self> {
        if !self.contains(product_id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.id != product_id)
            .cloned()
            .collect();
        Some(Self { items })
    }

    /// Returns a cart with the amount of `product_id` replaced, or None if it is absent.
    pub(crate) fn with_amount(&self, product_id: ProductId, amount: NonZeroU32) -> Option<Self> {
        let position = self.items.iter().position(|item| item.id == product_id)?;
        let mut items = self.items.clone();
        items[position].amount = amount.get();
        Some(Self { items })
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
