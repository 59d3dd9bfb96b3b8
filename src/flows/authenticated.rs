//! Authentication status check based on the stored access token's expiry.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use tracing::debug;

use super::RefreshParams;
use crate::manager::SessionManager;
use crate::storage::StorageKey;

impl SessionManager {
    /// Whether a non-expired access token is currently stored.
    ///
    /// This only inspects the token's `exp` claim; it performs no signature
    /// validation. Any failure — no token, undecodable payload, missing
    /// expiry — degrades to `false` with a diagnostic, never an error.
    pub async fn is_authenticated(&self) -> bool {
        matches!(self.access_token_expiry_state().await, ExpiryState::Valid)
    }

    /// Like [`SessionManager::is_authenticated`], but attempts a refresh when
    /// the stored token has expired and reports whether the refresh
    /// succeeded.
    pub async fn is_authenticated_or_refresh(&self, domain: &str, client_id: &str) -> bool {
        match self.access_token_expiry_state().await {
            ExpiryState::Valid => true,
            ExpiryState::Expired => {
                let params = RefreshParams {
                    domain: domain.to_string(),
                    client_id: client_id.to_string(),
                    on_refresh: None,
                };
                match self.refresh_token(params).await {
                    Ok(_) => true,
                    Err(error) => {
                        debug!(%error, "refresh during authentication check failed");
                        false
                    }
                }
            }
            ExpiryState::Unusable => false,
        }
    }

    async fn access_token_expiry_state(&self) -> ExpiryState {
        let Some(store) = self.active_storage() else {
            return ExpiryState::Unusable;
        };
        let token = match store.get_item(StorageKey::AccessToken).await {
            Ok(Some(token)) => token,
            Ok(None) => return ExpiryState::Unusable,
            Err(error) => {
                debug!(%error, "could not read access token for authentication check");
                return ExpiryState::Unusable;
            }
        };
        match decode_expiry(&token) {
            Some(exp) if exp < Utc::now().timestamp() => ExpiryState::Expired,
            Some(_) => ExpiryState::Valid,
            None => {
                debug!("access token has no usable expiry");
                ExpiryState::Unusable
            }
        }
    }
}

enum ExpiryState {
    Valid,
    Expired,
    Unusable,
}

/// Pull the `exp` claim out of a JWT without validating anything else.
fn decode_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    claims.get("exp")?.as_i64()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{MemoryStore, SessionStore};

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
        format!("{header}.{payload}.sig")
    }

    #[tokio::test]
    async fn valid_token_is_authenticated() {
        let manager = SessionManager::new();
        let store = Arc::new(MemoryStore::new());
        store
            .set_item(
                StorageKey::AccessToken,
                &jwt_with_exp(Utc::now().timestamp() + 600),
            )
            .await
            .unwrap();
        manager.set_active_storage(store);

        assert!(manager.is_authenticated().await);
    }

    #[tokio::test]
    async fn expired_token_is_not_authenticated() {
        let manager = SessionManager::new();
        let store = Arc::new(MemoryStore::new());
        store
            .set_item(
                StorageKey::AccessToken,
                &jwt_with_exp(Utc::now().timestamp() - 600),
            )
            .await
            .unwrap();
        manager.set_active_storage(store);

        assert!(!manager.is_authenticated().await);
    }

    #[tokio::test]
    async fn missing_store_or_token_degrades_to_false() {
        let manager = SessionManager::new();
        assert!(!manager.is_authenticated().await);

        manager.set_active_storage(Arc::new(MemoryStore::new()));
        assert!(!manager.is_authenticated().await);
    }

    #[tokio::test]
    async fn garbage_token_degrades_to_false() {
        let manager = SessionManager::new();
        let store = Arc::new(MemoryStore::new());
        store
            .set_item(StorageKey::AccessToken, "not-a-jwt")
            .await
            .unwrap();
        manager.set_active_storage(store);

        assert!(!manager.is_authenticated().await);
    }

    #[tokio::test]
    async fn token_without_exp_degrades_to_false() {
        let manager = SessionManager::new();
        let store = Arc::new(MemoryStore::new());
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"user"}"#);
        store
            .set_item(StorageKey::AccessToken, &format!("{header}.{payload}.s"))
            .await
            .unwrap();
        manager.set_active_storage(store);

        assert!(!manager.is_authenticated().await);
    }

    #[test]
    fn decode_expiry_reads_the_exp_claim() {
        assert_eq!(decode_expiry(&jwt_with_exp(12345)), Some(12345));
        assert_eq!(decode_expiry("bad"), None);
    }
}
