use std::sync::Arc;

use axum::{
    Extension, Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    error::{AuthError, ProxyError},
    spotify::{SpotifyClient, player::SkipDirection},
    types::{BeatReport, NowPlaying},
    warning,
};

pub const IDLE_TEXT: &str = "Nothing playing right now.";
pub const LOGIN_REQUIRED_TEXT: &str = "⚠️ You need to log in at /login first!";
pub const SESSION_REJECTED_TEXT: &str = "⚠️ Spotify rejected the session, log in again at /login.";

/// A failed proxy call plus the text shown to the caller when Spotify itself
/// failed.
pub struct ApiError {
    source: ProxyError,
    context: &'static str,
}

impl ApiError {
    fn with_context(context: &'static str) -> impl FnOnce(ProxyError) -> Self {
        move |source| Self { source, context }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.source {
            ProxyError::Auth(AuthError::NotAuthenticated | AuthError::NoRefreshToken) => {
                (StatusCode::UNAUTHORIZED, LOGIN_REQUIRED_TEXT).into_response()
            }
            ProxyError::Auth(AuthError::UpstreamUnauthorized { .. }) => {
                warning!("{}: {}", self.context, self.source);
                (StatusCode::UNAUTHORIZED, SESSION_REJECTED_TEXT).into_response()
            }
            _ => {
                warning!("{}: {}", self.context, self.source);
                (StatusCode::BAD_GATEWAY, self.context).into_response()
            }
        }
    }
}

/// `GET /spotify`: `"Artist1, Artist2 - Track"` or the idle text.
pub async fn now_playing(
    Extension(client): Extension<Arc<SpotifyClient>>,
) -> Result<String, ApiError> {
    let playing = client
        .now_playing()
        .await
        .map_err(ApiError::with_context("Failed to fetch the current track."))?;

    Ok(match playing {
        NowPlaying::Idle => IDLE_TEXT.to_string(),
        NowPlaying::Playing(track) => track.to_string(),
    })
}

pub async fn previous(
    Extension(client): Extension<Arc<SpotifyClient>>,
) -> Result<&'static str, ApiError> {
    client
        .skip(SkipDirection::Previous)
        .await
        .map_err(ApiError::with_context("Failed to go back a track."))?;
    Ok("⏪ Previous track!")
}

pub async fn next(
    Extension(client): Extension<Arc<SpotifyClient>>,
) -> Result<&'static str, ApiError> {
    client
        .skip(SkipDirection::Next)
        .await
        .map_err(ApiError::with_context("Failed to skip the track."))?;
    Ok("⏭ Next track!")
}

/// `GET /beat`: `{"beats": [...], "tempo": ...}` or the idle text.
pub async fn beat(Extension(client): Extension<Arc<SpotifyClient>>) -> Result<Response, ApiError> {
    let report = client
        .rhythm_analysis()
        .await
        .map_err(ApiError::with_context("Failed to fetch the track analysis."))?;

    Ok(match report {
        BeatReport::Idle => IDLE_TEXT.into_response(),
        BeatReport::Analysis(analysis) => Json(analysis).into_response(),
    })
}
