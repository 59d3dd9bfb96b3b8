use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use strum::IntoEnumIterator;
use tracing::warn;

use super::error::StoreError;
use super::settings::SharedSettings;
use super::{SessionStore, StorageKey};
use crate::util::split_chunks;

/// Primitive key-value surface of a native backend with a per-entry size
/// ceiling (browser extension storage, mobile secure enclave, and similar).
///
/// Implementations only handle single physical entries; chunk assembly lives
/// entirely in [`ChunkedStore`]. Backends that load asynchronously report
/// readiness through [`ChunkBackend::is_ready`].
#[async_trait]
pub trait ChunkBackend: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove_item(&self, key: &str) -> Result<(), StoreError>;

    /// Whether the backend has finished loading. Defaults to always ready.
    fn is_ready(&self) -> bool {
        true
    }
}

const READY_POLL_ATTEMPTS: u32 = 20;
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

const READINESS_UNKNOWN: u8 = 0;
const READINESS_READY: u8 = 1;
const READINESS_FAILED: u8 = 2;

/// Session store adapter that splits oversized values into indexed chunks.
///
/// A value is stored as physical entries `{key_prefix}{logicalKey}{index}`,
/// each at most `max_length` characters (both taken from the shared settings
/// at call time). Writes purge any previous chunks first, so a shorter
/// replacement leaves no orphaned tail. Reads walk indices from zero and stop
/// at the first absent chunk.
///
/// An empty concatenation is reported as absent: backends behind this adapter
/// cannot distinguish a stored empty string from a missing key, and the
/// adapter deliberately preserves that behavior.
pub struct ChunkedStore<B: ChunkBackend> {
    backend: B,
    settings: SharedSettings,
    readiness: AtomicU8,
}

impl<B: ChunkBackend> ChunkedStore<B> {
    /// Wrap `backend`, reading configuration through `settings` on every call.
    pub fn new(backend: B, settings: SharedSettings) -> Self {
        Self {
            backend,
            settings,
            readiness: AtomicU8::new(READINESS_UNKNOWN),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Await backend readiness with a bounded poll.
    ///
    /// Exhausting the poll latches the adapter into a failed state; every
    /// later operation fails fast instead of polling (or hanging) again.
    async fn ensure_ready(&self) -> Result<(), StoreError> {
        match self.readiness.load(Ordering::Acquire) {
            READINESS_READY => return Ok(()),
            READINESS_FAILED => return Err(StoreError::BackendUnavailable),
            _ => {}
        }
        let mut attempts = 0;
        while !self.backend.is_ready() {
            attempts += 1;
            if attempts >= READY_POLL_ATTEMPTS {
                self.readiness.store(READINESS_FAILED, Ordering::Release);
                warn!("chunk backend never became ready; adapter disabled");
                return Err(StoreError::BackendUnavailable);
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
        self.readiness.store(READINESS_READY, Ordering::Release);
        Ok(())
    }

    fn physical_key(prefix: &str, key: StorageKey, index: usize) -> String {
        format!("{prefix}{key}{index}")
    }
}

#[async_trait]
impl<B: ChunkBackend> SessionStore for ChunkedStore<B> {
    async fn get_item(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        self.ensure_ready().await?;
        let prefix = self.settings.get().key_prefix;

        let mut value = String::new();
        let mut index = 0;
        while let Some(chunk) = self
            .backend
            .get_item(&Self::physical_key(&prefix, key, index))
            .await?
        {
            value.push_str(&chunk);
            index += 1;
        }

        // Empty concatenation doubles as "absent" on these backends.
        if value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }

    async fn set_item(&self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        self.ensure_ready().await?;
        // Purge first: a shorter value must not leave old high-index chunks.
        self.remove_item(key).await?;

        let settings = self.settings.get();
        let max_length = settings.max_length.max(1);
        for (index, chunk) in split_chunks(value, max_length).iter().enumerate() {
            self.backend
                .set_item(&Self::physical_key(&settings.key_prefix, key, index), chunk)
                .await?;
        }
        Ok(())
    }

    async fn remove_item(&self, key: StorageKey) -> Result<(), StoreError> {
        self.ensure_ready().await?;
        let prefix = self.settings.get().key_prefix;

        let mut index = 0;
        loop {
            let physical = Self::physical_key(&prefix, key, index);
            if self.backend.get_item(&physical).await?.is_none() {
                return Ok(());
            }
            self.backend.remove_item(&physical).await?;
            index += 1;
        }
    }

    async fn destroy_session(&self) -> Result<(), StoreError> {
        for key in StorageKey::iter() {
            self.remove_item(key).await?;
        }
        Ok(())
    }
}
