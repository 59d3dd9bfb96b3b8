use thiserror::Error;

/// Storage-layer errors, converted into [`crate::error::SessionError`] at the
/// flow boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The native backend never became ready within the bounded poll.
    /// Once reported, the adapter stays non-functional.
    #[error("Storage backend unavailable")]
    BackendUnavailable,

    /// The native backend rejected an operation.
    #[error("Storage backend error: {0}")]
    Backend(String),
}
