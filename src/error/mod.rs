//! Error types for kinde-session.

use thiserror::Error;

use crate::storage::StoreError;

/// Primary error type surfaced by the exchange and refresh flows.
///
/// The display strings are part of the public contract: host applications
/// match on them (or on the variants) to distinguish validation problems,
/// uninitialized storage, transport failures, and unusable server responses.
/// Flows never panic across this boundary; every internal failure is
/// converted into one of these values.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Redirect parameters were missing `state` or `code`.
    #[error("Invalid state or code")]
    InvalidStateOrCode,

    /// No active store was registered before calling the exchange flow.
    #[error("Authentication storage is not initialized")]
    StorageNotInitialized,

    /// The supplied anti-forgery state did not match the stored one.
    #[error("Invalid state; supplied {supplied}, expected {expected}")]
    StateMismatch { supplied: String, expected: String },

    /// No PKCE code verifier was stored before the redirect completed.
    #[error("Code verifier not found")]
    CodeVerifierNotFound,

    /// The token endpoint answered with a non-success status.
    #[error("Token exchange failed: {status} - {body}")]
    ExchangeFailed { status: u16, body: String },

    /// The token-exchange request never produced an HTTP response.
    #[error("Token exchange failed: {0}")]
    ExchangeTransport(String),

    /// A success response arrived without an `access_token` field.
    #[error("No access token received")]
    NoAccessToken,

    #[error("Domain is required for token refresh")]
    MissingDomain,

    #[error("Client ID is required for token refresh")]
    MissingClientId,

    /// No active store was registered before calling the refresh flow.
    #[error("No active storage found")]
    NoActiveStorage,

    /// The resolved store holds no refresh token.
    #[error("No refresh token found")]
    NoRefreshToken,

    /// The token endpoint answered the refresh request with a non-ok status.
    #[error("Failed to refresh token")]
    RefreshFailed,

    /// The refresh request never produced an HTTP response.
    #[error("Token refresh failed: {0}")]
    RefreshTransport(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SessionError>;
