//! Convenience re-exports for common use.

pub use crate::error::{Result, SessionError};
pub use crate::flows::{
    ExchangeParams, FrameworkSettings, RefreshParams, TokenCallback, TokenSet,
};
pub use crate::manager::SessionManager;
pub use crate::storage::{
    ChunkBackend, ChunkedStore, MemoryStore, SessionStore, SharedSettings, StorageKey,
    StorageSettings, StoreError,
};
