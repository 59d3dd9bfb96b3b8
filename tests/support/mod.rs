#![allow(dead_code)]

use std::sync::Arc;

use kinde_session::prelude::*;

/// Manager with a fresh in-memory active store, plus a handle to that store.
pub fn manager_with_memory_store() -> (SessionManager, Arc<MemoryStore>) {
    let manager = SessionManager::new();
    let store = Arc::new(MemoryStore::new());
    manager.set_active_storage(store.clone());
    (manager, store)
}

pub async fn seed(store: &MemoryStore, entries: &[(StorageKey, &str)]) {
    store.set_items(entries).await.expect("seed storage");
}

pub async fn read(store: &MemoryStore, key: StorageKey) -> Option<String> {
    store.get_item(key).await.expect("read storage")
}
