//! Token flows: authorization-code exchange and refresh rotation.

pub mod authenticated;
pub mod exchange;
pub mod header;
pub mod refresh;

pub use header::FrameworkSettings;

use std::sync::Arc;

use bon::Builder;
use serde::Deserialize;

use crate::error::{Result, SessionError};
use crate::manager::SessionManager;
use crate::storage::StorageKey;

/// Tokens produced by a successful exchange or refresh, persisted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Invoked with the fresh tokens after a successful refresh.
pub type TokenCallback = Arc<dyn Fn(&TokenSet) + Send + Sync>;

/// Success body of the token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenEndpointResponse {
    pub access_token: Option<String>,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Seconds until expiry. Absent means no automatic refresh is scheduled.
    pub expires_in: Option<u64>,
}

/// Inputs to [`SessionManager::exchange_authorization_code`].
#[derive(Clone, Builder)]
pub struct ExchangeParams {
    /// Query parameters of the inbound redirect; must carry `state` and `code`.
    pub url_params: Vec<(String, String)>,
    #[builder(into)]
    pub domain: String,
    #[builder(into)]
    pub client_id: String,
    #[builder(into)]
    pub redirect_url: String,
    /// Arm the refresh timer when the response carries `expires_in`.
    #[builder(default)]
    pub auto_refresh: bool,
    /// Forwarded to the first timer-driven refresh armed by this exchange.
    pub on_refresh: Option<TokenCallback>,
}

/// Inputs to [`SessionManager::refresh_token`].
#[derive(Clone, Builder)]
pub struct RefreshParams {
    #[builder(into)]
    pub domain: String,
    #[builder(into)]
    pub client_id: String,
    pub on_refresh: Option<TokenCallback>,
}

impl SessionManager {
    /// Persist a token set: access/ID tokens through the active store, the
    /// refresh token through the policy-resolved store. Both flows share this
    /// path so secure/insecure routing is decided in exactly one place.
    ///
    /// When the refresh token resolves to the active store the whole triple
    /// goes out as one batched write.
    pub(crate) async fn persist_tokens(&self, tokens: &TokenSet) -> Result<()> {
        let active = self
            .active_storage()
            .ok_or(SessionError::NoActiveStorage)?;

        let mut entries: Vec<(StorageKey, &str)> =
            vec![(StorageKey::AccessToken, tokens.access_token.as_str())];
        if let Some(id_token) = &tokens.id_token {
            entries.push((StorageKey::IdToken, id_token));
        }

        if let Some(refresh_token) = &tokens.refresh_token {
            let refresh_store = self
                .resolve_store_for(StorageKey::RefreshToken)
                .ok_or(SessionError::NoActiveStorage)?;
            if Arc::ptr_eq(&refresh_store, &active) {
                entries.push((StorageKey::RefreshToken, refresh_token));
            } else {
                refresh_store
                    .set_item(StorageKey::RefreshToken, refresh_token)
                    .await?;
            }
        }

        active.set_items(&entries).await?;
        Ok(())
    }

    /// Arm the refresh timer with a refresh bound to the same domain/client.
    ///
    /// The rescheduled refresh re-arms itself the same way for as long as the
    /// server keeps returning an expiry, so the cycle is self-perpetuating.
    pub(crate) fn schedule_refresh(
        &self,
        delay_secs: u64,
        domain: &str,
        client_id: &str,
        on_refresh: Option<TokenCallback>,
    ) {
        let manager = self.clone();
        let params = RefreshParams {
            domain: domain.to_string(),
            client_id: client_id.to_string(),
            on_refresh,
        };
        self.timer().arm(delay_secs, async move {
            if let Err(error) = manager.refresh_token(params).await {
                tracing::warn!(%error, "scheduled token refresh failed");
            }
        });
    }
}
