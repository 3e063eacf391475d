use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{info, spotify::SpotifyClient, warning};

/// Redirects the browser to Spotify's consent page.
pub async fn login(Extension(client): Extension<Arc<SpotifyClient>>) -> Response {
    let url = client.authorization_url();
    (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response()
}

/// Completes the login by exchanging the `code` Spotify redirected back with.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(client): Extension<Arc<SpotifyClient>>,
) -> Response {
    if let Some(reason) = params.get("error") {
        warning!("Authorization was denied: {}", reason);
        return (
            StatusCode::BAD_REQUEST,
            format!("Authorization denied: {}.", reason),
        )
            .into_response();
    }

    let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing authorization code.").into_response();
    };

    match client.exchange_code(code).await {
        Ok(_) => {
            info!("Credentials stored, /spotify is ready.");
            "Login successful! You can now use /spotify.".into_response()
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            (StatusCode::BAD_GATEWAY, "Failed to obtain tokens.").into_response()
        }
    }
}
