//! # Spotify Integration Module
//!
//! The only layer that talks to Spotify. It owns the HTTP client, the
//! immutable [`SpotifyConfig`] and a shared handle to the [`TokenStore`], and
//! maps Spotify's JSON shapes onto the crate's own types.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api)          background refresh (management)
//!          ↓                              ↓
//!                  SpotifyClient
//!     ├── auth    (consent URL, code exchange, refresh)
//!     └── player  (now playing, skip, rhythm analysis)
//!          ↓
//! reqwest → accounts.spotify.com / api.spotify.com
//! ```
//!
//! ## Credential Lifecycle
//!
//! - [`SpotifyClient::authorization_url`] builds the consent redirect.
//! - [`SpotifyClient::exchange_code`] fills the token store once per login.
//! - [`SpotifyClient::refresh`] swaps in a new access token and keeps the
//!   refresh token obtained at login.
//!
//! Every player call goes through the token store's gate first and performs
//! no network I/O when no access token is held. The access token is re-read
//! from the store for every outbound call, so a concurrent refresh is picked
//! up by the next request.
//!
//! ## Error Types
//!
//! - [`AuthError`] for the token endpoint and the gate
//! - [`ProxyError`] for Web API calls; a `401` from Spotify surfaces as
//!   `AuthError::UpstreamUnauthorized`, anything else non-2xx as
//!   `ProxyError::UpstreamFailed` with status and body preserved.
//!
//! Nothing in this module retries.

pub mod auth;
pub mod player;

use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};

use crate::{
    config::SpotifyConfig,
    error::{AuthError, ProxyError},
    management::TokenStore,
};

pub struct SpotifyClient {
    http: Client,
    config: Arc<SpotifyConfig>,
    tokens: Arc<TokenStore>,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Self {
        Self {
            http: Client::new(),
            config: Arc::new(config),
            tokens: Arc::new(TokenStore::new()),
        }
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Sends a bearer-authenticated request to `{api_url}{path}`.
    ///
    /// The gate runs before the request is built; on `NotAuthenticated` no
    /// network call is attempted.
    async fn api_request(&self, method: Method, path: &str) -> Result<Response, ProxyError> {
        let token = self.tokens.require_access_token()?;
        let url = format!("{}{}", self.config.api_url, path);

        let mut request = self.http.request(method.clone(), &url).bearer_auth(token);
        if method == Method::POST {
            request = request.body(Vec::new());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProxyError::UpstreamFailed {
                status: None,
                payload: e.to_string(),
            })?;

        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, ProxyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let payload = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED {
        return Err(AuthError::UpstreamUnauthorized { payload }.into());
    }

    Err(ProxyError::UpstreamFailed {
        status: Some(status.as_u16()),
        payload,
    })
}
