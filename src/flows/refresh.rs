//! Refresh-token rotation flow.

use tracing::debug;

use super::exchange::FORM_CONTENT_TYPE;
use super::header::SDK_HEADER;
use super::{RefreshParams, TokenEndpointResponse, TokenSet};
use crate::error::{Result, SessionError};
use crate::manager::SessionManager;
use crate::storage::StorageKey;
use crate::util::{encode_form, sanitize_url};

impl SessionManager {
    /// Rotate tokens using the stored refresh token.
    ///
    /// Safe to call directly (manual refresh) and as the timer-driven
    /// callback — both paths run this exact validation and persistence. The
    /// refresh token is read from and written back to the store chosen by
    /// [`SessionManager::resolve_store_for`], so the secure/insecure split
    /// holds across rotations. When the response carries `expires_in` the
    /// timer is re-armed with this same flow, producing a self-perpetuating
    /// refresh cycle for as long as the server keeps returning an expiry.
    pub async fn refresh_token(&self, params: RefreshParams) -> Result<TokenSet> {
        if params.domain.is_empty() {
            return Err(SessionError::MissingDomain);
        }
        if params.client_id.is_empty() {
            return Err(SessionError::MissingClientId);
        }

        // The active store receives the access/ID tokens; require it before
        // touching the network, even when the refresh token lives elsewhere.
        if self.active_storage().is_none() {
            return Err(SessionError::NoActiveStorage);
        }
        let refresh_store = self
            .resolve_store_for(StorageKey::RefreshToken)
            .ok_or(SessionError::NoActiveStorage)?;
        let refresh_token = refresh_store
            .get_item(StorageKey::RefreshToken)
            .await?
            .ok_or(SessionError::NoRefreshToken)?;

        let token_url = format!("{}/oauth2/token", sanitize_url(&params.domain));
        debug!(url = %token_url, "refreshing token");
        let response = self
            .http()
            .post(&token_url)
            .header("Content-Type", FORM_CONTENT_TYPE)
            .header(SDK_HEADER, self.framework_settings().sdk_header_value())
            .body(encode_form(&[
                ("grant_type", "refresh_token"),
                ("client_id", params.client_id.as_str()),
                ("refresh_token", refresh_token.as_str()),
            ]))
            .send()
            .await
            .map_err(|error| SessionError::RefreshTransport(error.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionError::RefreshFailed);
        }

        let payload: TokenEndpointResponse = response
            .json()
            .await
            .map_err(|error| SessionError::RefreshTransport(error.to_string()))?;
        let Some(access_token) = payload.access_token else {
            return Err(SessionError::NoAccessToken);
        };

        let tokens = TokenSet {
            access_token,
            id_token: payload.id_token,
            refresh_token: payload.refresh_token,
        };
        self.persist_tokens(&tokens).await?;

        if let Some(on_refresh) = &params.on_refresh {
            on_refresh(&tokens);
        }

        // The rescheduled refresh carries no per-call callback.
        if let Some(expires_in) = payload.expires_in {
            self.schedule_refresh(expires_in, &params.domain, &params.client_id, None);
        }

        Ok(tokens)
    }
}
