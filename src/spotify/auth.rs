use reqwest::Url;

use crate::{
    error::AuthError,
    success,
    types::{AuthorizationRequest, CredentialPair, TokenResponse},
    warning,
};

use super::SpotifyClient;

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Builds the consent redirect target for `request`.
///
/// Deterministic and free of side effects. Parameters are appended with
/// `application/x-www-form-urlencoded` rules and the scopes are joined with a
/// single space.
///
/// # Example
///
/// ```
/// let url = build_authorization_url(&config.auth_url, &config.authorization_request());
/// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
/// ```
pub fn build_authorization_url(auth_url: &Url, request: &AuthorizationRequest) -> Url {
    let scope = request
        .scopes
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let mut url = auth_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &request.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &request.redirect_uri)
        .append_pair("scope", &scope);
    url
}

/// Failure talking to the token endpoint, before it is classified as an
/// exchange or a refresh failure.
struct TokenEndpointFailure {
    status: Option<u16>,
    payload: String,
}

impl SpotifyClient {
    pub fn authorization_url(&self) -> Url {
        build_authorization_url(&self.config.auth_url, &self.config.authorization_request())
    }

    /// Exchanges an authorization code for the initial token pair.
    ///
    /// Issues one `POST` to the token endpoint with the `authorization_code`
    /// grant and the client credentials in the form body. The store is written
    /// only when the response is a 2xx carrying both `access_token` and
    /// `refresh_token`; the stored pair is returned.
    ///
    /// # Errors
    ///
    /// `AuthError::ExchangeFailed` on transport failure, a non-2xx status or a
    /// response missing either token. The provider's body is kept as payload
    /// and the token store is left unchanged.
    pub async fn exchange_code(&self, code: &str) -> Result<CredentialPair, AuthError> {
        let credentials = &self.config.credentials;
        let (token, raw) = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .await
            .map_err(|f| AuthError::ExchangeFailed {
                status: f.status,
                payload: f.payload,
            })?;

        let (Some(access_token), Some(refresh_token)) = (
            non_empty(token.access_token),
            non_empty(token.refresh_token),
        ) else {
            return Err(AuthError::ExchangeFailed {
                status: Some(raw.0),
                payload: raw.1,
            });
        };

        let pair = CredentialPair::new(
            access_token,
            refresh_token,
            token.scope.unwrap_or_default(),
            token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        );
        self.tokens.replace(pair.clone());

        success!("Login successful, tokens received.");
        Ok(pair)
    }

    /// Exchanges the held refresh token for a new access token.
    ///
    /// Only the access token and its expiry are replaced. A refresh token in
    /// the response is ignored and the one obtained at login stays in place.
    ///
    /// # Errors
    ///
    /// - `AuthError::NoRefreshToken` when no login has completed; no request
    ///   is sent.
    /// - `AuthError::RefreshFailed` on transport failure, a non-2xx status or
    ///   a response without `access_token`. The store is left unchanged.
    /// - `AuthError::RefreshFailed` without a status when a new login replaced
    ///   the pair while the request was in flight; the result is dropped.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let refresh_token = self.tokens.refresh_token()?;
        let credentials = &self.config.credentials;

        let (token, raw) = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .await
            .map_err(|f| AuthError::RefreshFailed {
                status: f.status,
                payload: f.payload,
            })?;

        let Some(access_token) = non_empty(token.access_token) else {
            return Err(AuthError::RefreshFailed {
                status: Some(raw.0),
                payload: raw.1,
            });
        };

        if non_empty(token.refresh_token).is_some_and(|rotated| rotated != refresh_token) {
            warning!("Spotify issued a new refresh token; keeping the one obtained at login.");
        }

        self.tokens.update_access_token(
            &refresh_token,
            access_token,
            token.scope,
            token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        )?;

        success!("Access token refreshed.");
        Ok(())
    }

    /// Posts `form` to the token endpoint and decodes a 2xx body.
    ///
    /// Returns the decoded response together with the status and raw body so
    /// callers can report a well-formed but incomplete answer.
    async fn request_token(
        &self,
        form: &[(&str, &str)],
    ) -> Result<(TokenResponse, (u16, String)), TokenEndpointFailure> {
        let res = self
            .http
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| TokenEndpointFailure {
                status: None,
                payload: e.to_string(),
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| TokenEndpointFailure {
            status: Some(status.as_u16()),
            payload: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(TokenEndpointFailure {
                status: Some(status.as_u16()),
                payload: body,
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| TokenEndpointFailure {
                status: Some(status.as_u16()),
                payload: format!("{}: {}", e, body),
            })?;

        Ok((token, (status.as_u16(), body)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
