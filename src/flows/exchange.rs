//! Authorization-code exchange flow.

use tracing::debug;

use super::header::SDK_HEADER;
use super::{ExchangeParams, TokenEndpointResponse, TokenSet};
use crate::error::{Result, SessionError};
use crate::manager::SessionManager;
use crate::storage::StorageKey;
use crate::util::{encode_form, sanitize_url};

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

fn find_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

impl SessionManager {
    /// Complete the redirect leg of the authorization-code flow.
    ///
    /// Validates the inbound `state` against the stored anti-forgery value
    /// and exchanges the code (with the stored PKCE verifier) at
    /// `{domain}/oauth2/token`. On success the tokens are persisted through
    /// the registered stores, the temporary state/verifier entries are
    /// cleared so the redirect cannot be replayed, and — when requested and
    /// the server supplied an expiry — the refresh timer is armed with a
    /// refresh bound to the same domain and client.
    ///
    /// Storage is always up to date by the time this returns. Every failure
    /// comes back as an [`SessionError`] value; nothing panics across this
    /// boundary.
    pub async fn exchange_authorization_code(&self, params: ExchangeParams) -> Result<TokenSet> {
        let state = find_param(&params.url_params, "state");
        let code = find_param(&params.url_params, "code");
        let (Some(state), Some(code)) = (state, code) else {
            return Err(SessionError::InvalidStateOrCode);
        };

        let store = self
            .active_storage()
            .ok_or(SessionError::StorageNotInitialized)?;

        let stored_state = store.get_item(StorageKey::State).await?;
        if stored_state.as_deref() != Some(state) {
            return Err(SessionError::StateMismatch {
                supplied: state.to_string(),
                expected: stored_state.unwrap_or_else(|| "null".to_string()),
            });
        }

        let code_verifier = store
            .get_item(StorageKey::CodeVerifier)
            .await?
            .ok_or(SessionError::CodeVerifierNotFound)?;

        let token_url = format!("{}/oauth2/token", sanitize_url(&params.domain));
        debug!(url = %token_url, "exchanging authorization code");
        let response = self
            .http()
            .post(&token_url)
            .header("Content-Type", FORM_CONTENT_TYPE)
            .header(SDK_HEADER, self.framework_settings().sdk_header_value())
            .body(encode_form(&[
                ("grant_type", "authorization_code"),
                ("client_id", params.client_id.as_str()),
                ("code", code),
                ("code_verifier", code_verifier.as_str()),
                ("redirect_uri", params.redirect_url.as_str()),
            ]))
            .send()
            .await
            .map_err(|error| SessionError::ExchangeTransport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::ExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let payload: TokenEndpointResponse = response
            .json()
            .await
            .map_err(|error| SessionError::ExchangeTransport(error.to_string()))?;
        let Some(access_token) = payload.access_token else {
            // Transport worked; the response body was unusable.
            return Err(SessionError::NoAccessToken);
        };

        let tokens = TokenSet {
            access_token,
            id_token: payload.id_token,
            refresh_token: payload.refresh_token,
        };
        self.persist_tokens(&tokens).await?;
        store.remove_item(StorageKey::State).await?;
        store.remove_item(StorageKey::CodeVerifier).await?;

        if params.auto_refresh {
            if let Some(expires_in) = payload.expires_in {
                self.schedule_refresh(
                    expires_in,
                    &params.domain,
                    &params.client_id,
                    params.on_refresh.clone(),
                );
            }
        }

        Ok(tokens)
    }
}
