use std::sync::{Arc, RwLock};

/// Process-wide storage configuration.
///
/// Read on every storage operation rather than snapshotted, so a mutation
/// through [`SharedSettings`] takes effect on the next call.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Prefix prepended to every physical key.
    pub key_prefix: String,
    /// Maximum characters storable per physical entry on constrained backends.
    pub max_length: usize,
    /// Route the refresh token to the insecure store when one is registered.
    pub use_insecure_for_refresh_token: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            key_prefix: String::new(),
            max_length: 2048,
            use_insecure_for_refresh_token: false,
        }
    }
}

/// Shared, mutable handle to [`StorageSettings`].
///
/// Held by the [`crate::manager::SessionManager`] and by any
/// [`crate::storage::ChunkedStore`] so both observe the same configuration.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<StorageSettings>>,
}

impl SharedSettings {
    pub fn new(settings: StorageSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Current settings by value. Guards are never held across await points.
    pub fn get(&self) -> StorageSettings {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Mutate the settings in place.
    pub fn update(&self, apply: impl FnOnce(&mut StorageSettings)) {
        match self.inner.write() {
            Ok(mut guard) => apply(&mut guard),
            Err(poisoned) => apply(&mut poisoned.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = StorageSettings::default();
        assert_eq!(settings.key_prefix, "");
        assert_eq!(settings.max_length, 2048);
        assert!(!settings.use_insecure_for_refresh_token);
    }

    #[test]
    fn update_is_visible_on_next_get() {
        let shared = SharedSettings::default();
        shared.update(|s| {
            s.key_prefix = "kinde.".to_string();
            s.use_insecure_for_refresh_token = true;
        });
        let seen = shared.get();
        assert_eq!(seen.key_prefix, "kinde.");
        assert!(seen.use_insecure_for_refresh_token);
    }

    #[test]
    fn clones_share_the_same_settings() {
        let shared = SharedSettings::default();
        let other = shared.clone();
        other.update(|s| s.max_length = 16);
        assert_eq!(shared.get().max_length, 16);
    }
}
