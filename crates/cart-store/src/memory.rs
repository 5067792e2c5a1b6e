use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{CartStore, Result, StoreError};

/// In-memory cart store for testing.
///
/// Clones share the same payloads, which lets a test inspect what an engine
/// wrote or start a second engine from the same "disk".
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartStore {
    payloads: Arc<RwLock<HashMap<String, String>>>,
    saves: Arc<AtomicUsize>,
    fail_on_save: Arc<AtomicBool>,
    fail_on_load: Arc<AtomicBool>,
    save_ack_delay: Arc<std::sync::RwLock<Option<Duration>>>,
}

impl InMemoryCartStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `payload` under `key`.
    pub fn with_payload(key: impl Into<String>, payload: impl Into<String>) -> Self {
        let mut payloads = HashMap::new();
        payloads.insert(key.into(), payload.into());
        Self {
            payloads: Arc::new(RwLock::new(payloads)),
            ..Self::default()
        }
    }

    /// Returns the raw payload stored under `key`.
    pub async fn payload(&self, key: &str) -> Option<String> {
        self.payloads.read().await.get(key).cloned()
    }

    /// Returns how many successful saves have been made.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Makes subsequent saves fail.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.fail_on_save.store(fail, Ordering::SeqCst);
    }

    /// Delays the acknowledgement of each save by `delay`.
    ///
    /// The payload is written before the delay starts, like a remote write
    /// that commits before its response arrives.
    pub fn set_save_ack_delay(&self, delay: Option<Duration>) {
        *self
            .save_ack_delay
            .write()
            .unwrap_or_else(|e| e.into_inner()) = delay;
    }

    /// Makes subsequent loads fail.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.fail_on_load.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        if self.fail_on_load.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store offline".to_string()));
        }
        Ok(self.payloads.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, payload: &str) -> Result<()> {
        if self.fail_on_save.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store offline".to_string()));
        }
        self.payloads
            .write()
            .await
            .insert(key.to_string(), payload.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);

        let delay = *self
            .save_ack_delay
            .read()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load() {
        let store = InMemoryCartStore::new();
        assert_eq!(store.load("cart").await.unwrap(), None);

        store.save("cart", "[]").await.unwrap();
        store.save("cart", r#"[{"id":1,"amount":1}]"#).await.unwrap();

        assert_eq!(
            store.load("cart").await.unwrap().as_deref(),
            Some(r#"[{"id":1,"amount":1}]"#)
        );
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryCartStore::with_payload("a", "[1]");
        store.save("b", "[2]").await.unwrap();

        assert_eq!(store.payload("a").await.as_deref(), Some("[1]"));
        assert_eq!(store.payload("b").await.as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn test_fail_on_save_keeps_previous_payload() {
        let store = InMemoryCartStore::with_payload("cart", "[]");
        store.set_fail_on_save(true);

        let result = store.save("cart", "[1]").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.payload("cart").await.as_deref(), Some("[]"));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_fail_on_load() {
        let store = InMemoryCartStore::with_payload("cart", "[]");
        store.set_fail_on_load(true);
        assert!(store.load("cart").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_ack_delay_writes_before_waiting() {
        let store = InMemoryCartStore::new();
        store.set_save_ack_delay(Some(Duration::from_millis(100)));

        let result =
            tokio::time::timeout(Duration::from_millis(10), store.save("cart", "[]")).await;

        assert!(result.is_err());
        assert_eq!(store.payload("cart").await.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_shared_through_arc_dyn() {
        let store = InMemoryCartStore::new();
        let dyn_store: Arc<dyn CartStore> = Arc::new(store.clone());

        dyn_store.save("cart", "[]").await.unwrap();
        assert_eq!(store.payload("cart").await.as_deref(), Some("[]"));
    }
}
