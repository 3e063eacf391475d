//! Error taxonomy for the credential lifecycle and the Spotify proxy.
//!
//! Lifecycle components never retry: every failure is returned to the HTTP
//! handler layer, which turns it into a status code and a short text (see
//! [`crate::api`]). Provider payloads are kept so the handler layer can log or
//! surface them.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The authorization code could not be exchanged for a token pair.
    #[error("authorization code exchange failed ({}): {payload}", status_label(.status))]
    ExchangeFailed {
        status: Option<u16>,
        payload: String,
    },

    /// The refresh token could not be exchanged for a new access token.
    #[error("token refresh failed ({}): {payload}", status_label(.status))]
    RefreshFailed {
        status: Option<u16>,
        payload: String,
    },

    #[error("no refresh token held, authorize via /login first")]
    NoRefreshToken,

    #[error("not authenticated, authorize via /login first")]
    NotAuthenticated,

    /// Spotify rejected the bearer token (expired or revoked).
    #[error("spotify rejected the access token: {payload}")]
    UpstreamUnauthorized { payload: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("spotify request failed ({}): {payload}", status_label(.status))]
    UpstreamFailed {
        status: Option<u16>,
        payload: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {}", code),
        None => "transport error".to_string(),
    }
}
