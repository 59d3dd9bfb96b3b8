//! Session storage: key enumeration, store trait, and backends.

pub mod chunked;
pub mod error;
pub mod memory;
pub mod settings;

pub use chunked::{ChunkBackend, ChunkedStore};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use settings::{SharedSettings, StorageSettings};

use async_trait::async_trait;
use strum::{AsRefStr, Display, EnumIter};

/// Logical keys a session store may hold.
///
/// The string form (camelCase, matching the original wire format) is what a
/// backend sees after the configured key prefix is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
pub enum StorageKey {
    #[strum(serialize = "state")]
    State,
    #[strum(serialize = "nonce")]
    Nonce,
    #[strum(serialize = "codeVerifier")]
    CodeVerifier,
    #[strum(serialize = "accessToken")]
    AccessToken,
    #[strum(serialize = "idToken")]
    IdToken,
    #[strum(serialize = "refreshToken")]
    RefreshToken,
}

/// Capability surface every session store variant implements.
///
/// The contract is read-your-writes per key: `set_item` followed by
/// `get_item` of the same key returns the same logical value regardless of
/// how the backend stores it, and `remove_item` leaves nothing readable
/// behind. Values are text; the signature enforces that at compile time.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the value for `key`, or `None` if nothing is stored.
    async fn get_item(&self, key: StorageKey) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StoreError>;

    /// Delete any value stored under `key`.
    async fn remove_item(&self, key: StorageKey) -> Result<(), StoreError>;

    /// Delete every key in the [`StorageKey`] enumeration.
    async fn destroy_session(&self) -> Result<(), StoreError>;

    /// Store several entries. The default writes them one by one; backends
    /// with a native batch operation may override.
    async fn set_items(&self, entries: &[(StorageKey, &str)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set_item(*key, value).await?;
        }
        Ok(())
    }
}
