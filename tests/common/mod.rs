#![allow(dead_code)]

use std::{collections::BTreeSet, net::SocketAddr, sync::Arc};

use reqwest::Url;
use serde_json::json;
use tunebridge::{
    config::SpotifyConfig,
    spotify::SpotifyClient,
    types::ClientCredentials,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

pub fn test_config(server: &MockServer) -> SpotifyConfig {
    SpotifyConfig {
        credentials: ClientCredentials {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        },
        redirect_uri: "http://127.0.0.1:5000/callback".to_string(),
        scopes: ["user-read-currently-playing", "user-modify-playback-state"]
            .iter()
            .map(|s| s.to_string())
            .collect::<BTreeSet<_>>(),
        auth_url: Url::parse("https://accounts.spotify.com/authorize").unwrap(),
        token_url: format!("{}/api/token", server.uri()),
        api_url: format!("{}/v1", server.uri()),
        server_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        refresh_interval: None,
    }
}

pub fn test_client(server: &MockServer) -> Arc<SpotifyClient> {
    Arc::new(SpotifyClient::new(test_config(server)))
}

/// Mounts a token endpoint answering the `authorization_code` grant.
pub async fn mount_code_exchange(server: &MockServer, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access,
            "token_type": "Bearer",
            "scope": "user-read-currently-playing",
            "expires_in": 3600,
            "refresh_token": refresh,
        })))
        .mount(server)
        .await;
}

/// Runs a successful login with `AT1` / `RT1`.
pub async fn logged_in_client(server: &MockServer) -> Arc<SpotifyClient> {
    mount_code_exchange(server, "AT1", "RT1").await;
    let client = test_client(server);
    client.exchange_code("abc123").await.unwrap();
    client
}
