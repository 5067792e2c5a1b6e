//! The cart engine: validated, write-through mutations of the cart.

use std::num::NonZeroU32;
use std::sync::Arc;

use cart_store::CartStore;
use catalog::{CatalogClient, CatalogError};
use common::ProductId;
use tokio::sync::{Mutex, watch};

use crate::cart::Cart;
use crate::error::CartError;

/// Outcome of a cart operation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// The cart changed and the store holds the new cart.
    Saved,
    /// The cart changed but the store write failed.
    ///
    /// The in-memory cart stays authoritative; the next successful save
    /// brings the store back in line.
    Unsaved { reason: String },
    /// Nothing changed: the requested amount was not positive.
    Ignored,
}

impl Mutation {
    /// Returns true if the cart changed.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Mutation::Ignored)
    }

    /// Returns true if the store is known to hold the current cart.
    pub fn is_persisted(&self) -> bool {
        matches!(self, Mutation::Saved)
    }

    /// Returns a short machine-readable name for the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mutation::Saved => "saved",
            Mutation::Unsaved { .. } => "unsaved",
            Mutation::Ignored => "ignored",
        }
    }
}

/// Owns the cart and serializes every change to it.
///
/// Each operation holds the update lock from its first read of the cart,
/// through the catalog call, to the store write. Readers go through
/// [`CartEngine::snapshot`] or [`CartEngine::subscribe`] and always see a
/// whole cart, either before or after a mutation.
pub struct CartEngine<C, S> {
    catalog: C,
    store: S,
    key: String,
    cart: Mutex<Arc<Cart>>,
    published: watch::Sender<Arc<Cart>>,
}

impl<C, S> CartEngine<C, S>
where
    C: CatalogClient,
    S: CartStore,
{
    /// Creates an engine, restoring the cart saved under `key`.
    ///
    /// A missing, unreadable or malformed payload starts an empty cart. The
    /// restored cart is not checked against current stock.
    #[tracing::instrument(skip_all, fields(key = %key.as_ref()))]
    pub async fn load(catalog: C, store: S, key: impl AsRef<str>) -> Self {
        let key = key.as_ref().to_string();

        let cart = match store.load(&key).await {
            Ok(Some(payload)) => match Cart::from_json(&payload) {
                Ok(cart) => {
                    tracing::info!(products = cart.len(), "cart restored from store");
                    cart
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stored cart is malformed, starting empty");
                    Cart::new()
                }
            },
            Ok(None) => {
                tracing::info!("no stored cart, starting empty");
                Cart::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored cart, starting empty");
                Cart::new()
            }
        };

        metrics::gauge!("cart_distinct_products").set(cart.len() as f64);

        let cart = Arc::new(cart);
        let (published, _) = watch::channel(Arc::clone(&cart));

        Self {
            catalog,
            store,
            key,
            cart: Mutex::new(cart),
            published,
        }
    }

    /// Returns the current cart.
    pub fn snapshot(&self) -> Arc<Cart> {
        self.published.borrow().clone()
    }

    /// Returns a receiver that is notified after every applied mutation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.published.subscribe()
    }

    /// Returns the store key the cart is saved under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Adds one unit of a product.
    ///
    /// A product already in the cart goes through
    /// [`update_product_amount`](Self::update_product_amount) with its amount
    /// plus one, including the stock check. A new product is fetched from the
    /// catalog and appended with amount one.
    #[tracing::instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Mutation, CartError> {
        let mut cart = self.cart.lock().await;
        let result = self.add_locked(&mut cart, product_id).await;
        record("add", &result);
        result
    }

    /// Removes a product.
    #[tracing::instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Mutation, CartError> {
        let mut cart = self.cart.lock().await;
        let result = match cart.without(product_id) {
            Some(next) => Ok(self.commit(&mut cart, next).await),
            None => Err(CartError::ProductRemoval { product_id }),
        };
        record("remove", &result);
        result
    }

    /// Sets the amount of a product already in the cart.
    ///
    /// A non-positive `amount` is ignored without contacting the catalog or
    /// the store; removal is [`remove_product`](Self::remove_product).
    #[tracing::instrument(skip(self))]
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Mutation, CartError> {
        if amount <= 0 {
            let result = Ok(Mutation::Ignored);
            record("update", &result);
            return result;
        }

        let mut cart = self.cart.lock().await;
        let result = self
            .update_locked(&mut cart, product_id, amount.unsigned_abs())
            .await;
        record("update", &result);
        result
    }

    async fn add_locked(
        &self,
        cart: &mut Arc<Cart>,
        product_id: ProductId,
    ) -> Result<Mutation, CartError> {
        if let Some(existing) = cart.get(product_id) {
            let requested = u64::from(existing.amount) + 1;
            return self.update_locked(cart, product_id, requested).await;
        }

        let product = self
            .catalog
            .get_product(product_id)
            .await
            .map_err(|source| CartError::ProductAddition { product_id, source })?;

        // A record for another product would break id uniqueness.
        if product.id != product_id {
            return Err(CartError::ProductAddition {
                product_id,
                source: CatalogError::Unidentifiable(product_id),
            });
        }

        let next = cart.with_added(product);
        Ok(self.commit(cart, next).await)
    }

    async fn update_locked(
        &self,
        cart: &mut Arc<Cart>,
        product_id: ProductId,
        requested: u64,
    ) -> Result<Mutation, CartError> {
        if !cart.contains(product_id) {
            return Err(CartError::ProductUpdate { product_id });
        }

        let stock = self
            .catalog
            .get_stock(product_id)
            .await
            .map_err(|source| CartError::StockUnavailable { product_id, source })?;

        let out_of_stock = CartError::OutOfStock {
            product_id,
            requested,
            available: stock.amount,
        };
        if requested > u64::from(stock.amount) {
            return Err(out_of_stock);
        }
        let amount = u32::try_from(requested)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(out_of_stock)?;

        let next = cart
            .with_amount(product_id, amount)
            .ok_or(CartError::ProductUpdate { product_id })?;
        Ok(self.commit(cart, next).await)
    }

    /// Makes `next` the current cart, then writes it through to the store.
    ///
    /// `next` is installed and published before the write starts, so a
    /// caller that stops waiting mid-write cannot leave the store ahead of
    /// memory. A failed write does not roll back.
    async fn commit(&self, cart: &mut Arc<Cart>, next: Cart) -> Mutation {
        metrics::gauge!("cart_distinct_products").set(next.len() as f64);

        let next = Arc::new(next);
        *cart = Arc::clone(&next);
        self.published.send_replace(Arc::clone(&next));

        let outcome = match next.to_json() {
            Ok(payload) => match self.store.save(&self.key, &payload).await {
                Ok(()) => Mutation::Saved,
                Err(e) => Mutation::Unsaved {
                    reason: e.to_string(),
                },
            },
            Err(e) => Mutation::Unsaved {
                reason: e.to_string(),
            },
        };

        if let Mutation::Unsaved { reason } = &outcome {
            metrics::counter!("cart_persist_failures_total").increment(1);
            tracing::error!(key = %self.key, %reason, "could not save cart");
        }

        outcome
    }
}

fn record(operation: &'static str, result: &Result<Mutation, CartError>) {
    match result {
        Ok(mutation) => {
            metrics::counter!(
                "cart_mutations_total",
                "operation" => operation,
                "outcome" => mutation.as_str()
            )
            .increment(1);
            tracing::debug!(operation, outcome = mutation.as_str(), "cart operation completed");
        }
        Err(e) => {
            metrics::counter!(
                "cart_mutations_total",
                "operation" => operation,
                "outcome" => e.kind()
            )
            .increment(1);
            tracing::info!(
                operation,
                product_id = %e.product_id(),
                error = %e,
                "cart operation rejected"
            );
        }
    }
}
