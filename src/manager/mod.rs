//! Session context: store registry, settings, and the refresh timer.

pub mod timer;

pub use timer::RefreshTimer;

use std::sync::{Arc, RwLock};

use crate::flows::FrameworkSettings;
use crate::storage::{SessionStore, SharedSettings, StorageKey};

/// Registry and context object the token flows operate through.
///
/// Holds the "active" (secure) and optional "insecure" store references, the
/// shared storage settings, the framework identity used for the SDK header,
/// the refresh timer, and a reused HTTP client. Cloning is cheap and every
/// clone observes the same state, so a host application typically constructs
/// one manager at startup and passes clones around — the single-instance
/// ergonomics of the original library, without hidden module-level state.
///
/// Store slots are process-wide mutable state with no cross-call lock;
/// avoiding mutation races (such as tearing down storage while a flow is
/// mid-exchange) is the caller's responsibility.
#[derive(Clone, Default)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    active: RwLock<Option<Arc<dyn SessionStore>>>,
    insecure: RwLock<Option<Arc<dyn SessionStore>>>,
    settings: SharedSettings,
    framework: RwLock<FrameworkSettings>,
    timer: RefreshTimer,
    http: reqwest::Client,
}

fn read_slot(
    slot: &RwLock<Option<Arc<dyn SessionStore>>>,
) -> Option<Arc<dyn SessionStore>> {
    match slot.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn write_slot(
    slot: &RwLock<Option<Arc<dyn SessionStore>>>,
    value: Option<Arc<dyn SessionStore>>,
) {
    match slot.write() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a manager sharing an existing settings handle, e.g. one
    /// already wired into a [`crate::storage::ChunkedStore`].
    pub fn with_settings(settings: SharedSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                settings,
                ..Inner::default()
            }),
        }
    }

    /// Designate `store` as the secure active session store.
    pub fn set_active_storage(&self, store: Arc<dyn SessionStore>) {
        write_slot(&self.inner.active, Some(store));
    }

    pub fn clear_active_storage(&self) {
        write_slot(&self.inner.active, None);
    }

    pub fn active_storage(&self) -> Option<Arc<dyn SessionStore>> {
        read_slot(&self.inner.active)
    }

    /// Register the optional secondary store used for size-unconstrained
    /// secrets when [`crate::storage::StorageSettings::use_insecure_for_refresh_token`]
    /// is set.
    pub fn set_insecure_storage(&self, store: Arc<dyn SessionStore>) {
        write_slot(&self.inner.insecure, Some(store));
    }

    pub fn clear_insecure_storage(&self) {
        write_slot(&self.inner.insecure, None);
    }

    pub fn insecure_storage(&self) -> Option<Arc<dyn SessionStore>> {
        read_slot(&self.inner.insecure)
    }

    /// The single place the secure/insecure routing policy lives.
    ///
    /// Returns the insecure store iff the settings flag is on, `key` is the
    /// refresh token, and an insecure store is registered; the active store
    /// otherwise. `None` when the resolved slot is unset. Everything touching
    /// the refresh token resolves its store here, never via
    /// [`SessionManager::active_storage`] directly.
    pub fn resolve_store_for(&self, key: StorageKey) -> Option<Arc<dyn SessionStore>> {
        if key == StorageKey::RefreshToken
            && self.inner.settings.get().use_insecure_for_refresh_token
        {
            if let Some(store) = self.insecure_storage() {
                return Some(store);
            }
        }
        self.active_storage()
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.inner.settings
    }

    pub fn framework_settings(&self) -> FrameworkSettings {
        match self.inner.framework.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update_framework_settings(&self, apply: impl FnOnce(&mut FrameworkSettings)) {
        match self.inner.framework.write() {
            Ok(mut guard) => apply(&mut guard),
            Err(poisoned) => apply(&mut poisoned.into_inner()),
        }
    }

    /// Cancel a pending automatic refresh, if any.
    pub fn cancel_refresh_timer(&self) {
        self.inner.timer.cancel();
    }

    pub(crate) fn timer(&self) -> &RefreshTimer {
        &self.inner.timer
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn active_slot_is_settable_and_clearable() {
        let manager = SessionManager::new();
        assert!(manager.active_storage().is_none());

        manager.set_active_storage(Arc::new(MemoryStore::new()));
        assert!(manager.active_storage().is_some());

        manager.clear_active_storage();
        assert!(manager.active_storage().is_none());
    }

    #[test]
    fn clones_share_slots() {
        let manager = SessionManager::new();
        let clone = manager.clone();
        clone.set_insecure_storage(Arc::new(MemoryStore::new()));
        assert!(manager.insecure_storage().is_some());
    }

    #[test]
    fn refresh_token_routes_to_insecure_only_when_configured() {
        let manager = SessionManager::new();
        let active: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
        let insecure: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
        manager.set_active_storage(active.clone());
        manager.set_insecure_storage(insecure.clone());

        // Flag off: refresh token stays on the active store.
        let resolved = manager.resolve_store_for(StorageKey::RefreshToken).unwrap();
        assert!(Arc::ptr_eq(&resolved, &active));

        manager
            .settings()
            .update(|s| s.use_insecure_for_refresh_token = true);
        let resolved = manager.resolve_store_for(StorageKey::RefreshToken).unwrap();
        assert!(Arc::ptr_eq(&resolved, &insecure));

        // Other keys never route to the insecure store.
        let resolved = manager.resolve_store_for(StorageKey::AccessToken).unwrap();
        assert!(Arc::ptr_eq(&resolved, &active));
    }

    #[test]
    fn refresh_token_falls_back_to_active_without_insecure_store() {
        let manager = SessionManager::new();
        let active: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
        manager.set_active_storage(active.clone());
        manager
            .settings()
            .update(|s| s.use_insecure_for_refresh_token = true);

        let resolved = manager.resolve_store_for(StorageKey::RefreshToken).unwrap();
        assert!(Arc::ptr_eq(&resolved, &active));
    }

    #[test]
    fn resolve_returns_none_when_no_store_is_registered() {
        let manager = SessionManager::new();
        assert!(manager.resolve_store_for(StorageKey::AccessToken).is_none());
        assert!(manager.resolve_store_for(StorageKey::RefreshToken).is_none());
    }
}
