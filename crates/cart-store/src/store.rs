use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

/// Key-value persistence for serialized carts.
///
/// Payloads survive process restarts. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Loads the payload stored under `key`.
    ///
    /// Returns None if nothing has been saved yet.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Saves `payload` under `key`, replacing any previous payload.
    async fn save(&self, key: &str, payload: &str) -> Result<()>;
}

#[async_trait]
impl<T: CartStore + ?Sized> CartStore for Arc<T> {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key).await
    }

    async fn save(&self, key: &str, payload: &str) -> Result<()> {
        (**self).save(key, payload).await
    }
}
