use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use strum::IntoEnumIterator;

use super::error::StoreError;
use super::{SessionStore, StorageKey};

/// In-memory session store, the default for tests and short-lived processes.
///
/// Unlike chunk-constrained backends, a stored empty string stays
/// distinguishable from an absent key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StorageKey, String>> {
        match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get_item(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(&key).cloned())
    }

    async fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key, value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: StorageKey) -> Result<(), StoreError> {
        self.lock().remove(&key);
        Ok(())
    }

    async fn destroy_session(&self) -> Result<(), StoreError> {
        let mut items = self.lock();
        for key in StorageKey::iter() {
            items.remove(&key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryStore::new();
        store.set_item(StorageKey::State, "abc").await.unwrap();
        assert_eq!(
            store.get_item(StorageKey::State).await.unwrap().as_deref(),
            Some("abc")
        );
    }

    #[tokio::test]
    async fn empty_string_is_not_absent() {
        let store = MemoryStore::new();
        store.set_item(StorageKey::Nonce, "").await.unwrap();
        assert_eq!(
            store.get_item(StorageKey::Nonce).await.unwrap().as_deref(),
            Some("")
        );
    }

    #[tokio::test]
    async fn remove_deletes_the_value() {
        let store = MemoryStore::new();
        store.set_item(StorageKey::IdToken, "id").await.unwrap();
        store.remove_item(StorageKey::IdToken).await.unwrap();
        assert!(store.get_item(StorageKey::IdToken).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn destroy_session_clears_every_key() {
        let store = MemoryStore::new();
        store
            .set_items(&[
                (StorageKey::AccessToken, "a"),
                (StorageKey::RefreshToken, "r"),
                (StorageKey::State, "s"),
            ])
            .await
            .unwrap();
        store.destroy_session().await.unwrap();
        for key in StorageKey::iter() {
            assert!(store.get_item(key).await.unwrap().is_none());
        }
    }
}
