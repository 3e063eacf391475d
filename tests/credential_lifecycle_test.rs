mod common;

use std::{sync::Arc, time::Duration};

use serde_json::json;
use tunebridge::{
    error::AuthError,
    management::{RefreshOutcome, refresh_if_expiring, spawn_refresh_task},
    spotify::SpotifyClient,
    types::CredentialPair,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, body_string_contains, method, path},
};

use common::{logged_in_client, mount_code_exchange, test_client};

#[tokio::test]
async fn test_exchange_code_then_gate_returns_issued_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc123"))
        .and(body_string_contains("client_id=client"))
        .and(body_string_contains("client_secret=secret"))
        .and(body_string_contains(
            "redirect_uri=http%3A%2F%2F127.0.0.1%3A5000%2Fcallback",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "AT1",
            "refresh_token": "RT1",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let pair = client.exchange_code("abc123").await.unwrap();

    assert_eq!(pair.access_token, "AT1");
    assert_eq!(pair.refresh_token, "RT1");
    assert_eq!(client.tokens().require_access_token().unwrap(), "AT1");
    assert_eq!(client.tokens().refresh_token().unwrap(), "RT1");
}

#[tokio::test]
async fn test_failed_exchange_keeps_provider_payload_and_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code",
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.exchange_code("bad").await.unwrap_err();

    match err {
        AuthError::ExchangeFailed { status, payload } => {
            assert_eq!(status, Some(400));
            assert!(payload.contains("invalid_grant"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        client.tokens().require_access_token(),
        Err(AuthError::NotAuthenticated)
    );
}

#[tokio::test]
async fn test_exchange_without_refresh_token_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "AT1",
            "expires_in": 3600,
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.exchange_code("abc123").await.unwrap_err();

    assert!(matches!(err, AuthError::ExchangeFailed { status: Some(200), .. }));
    assert!(!client.tokens().is_authenticated());
}

#[tokio::test]
async fn test_failed_exchange_after_login_leaves_previous_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("code=expired"))
        .respond_with(ResponseTemplate::new(400).set_body_string("expired"))
        .with_priority(1)
        .mount(&server)
        .await;
    let client = logged_in_client(&server).await;

    assert!(client.exchange_code("expired").await.is_err());
    assert_eq!(client.tokens().require_access_token().unwrap(), "AT1");
}

#[tokio::test]
async fn test_refresh_before_login_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert_eq!(client.refresh().await, Err(AuthError::NoRefreshToken));
}

#[tokio::test]
async fn test_refresh_replaces_access_token_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=RT1"))
        .and(body_string_contains("client_secret=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "AT2",
            "refresh_token": "RT2",
            "expires_in": 1800,
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in_client(&server).await;

    client.refresh().await.unwrap();

    let pair = client.tokens().snapshot();
    assert_eq!(pair.access_token, "AT2");
    assert_eq!(pair.refresh_token, "RT1");
    assert_eq!(pair.expires_in, 1800);
}

#[tokio::test]
async fn test_failed_refresh_leaves_store_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Refresh token revoked",
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in_client(&server).await;
    let before = client.tokens().snapshot();

    let err = client.refresh().await.unwrap_err();

    match err {
        AuthError::RefreshFailed { status, payload } => {
            assert_eq!(status, Some(400));
            assert!(payload.contains("Refresh token revoked"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(client.tokens().snapshot(), before);
}

#[tokio::test]
async fn test_refresh_response_without_access_token_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in_client(&server).await;
    let before = client.tokens().snapshot();

    let err = client.refresh().await.unwrap_err();

    match err {
        AuthError::RefreshFailed { status, payload } => {
            assert_eq!(status, Some(200));
            assert!(payload.contains("Bearer"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(client.tokens().snapshot(), before);
}

#[tokio::test]
async fn test_refresh_overtaken_by_new_login_keeps_new_pair() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=RT1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "access_token": "AT1-refreshed",
                    "expires_in": 3600,
                }))
                .set_delay(Duration::from_millis(400)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("code=second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "AT9",
            "refresh_token": "RT9",
            "expires_in": 3600,
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    let client = logged_in_client(&server).await;

    let refreshing = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    client.exchange_code("second").await.unwrap();

    let result = refreshing.await.unwrap();

    assert!(matches!(result, Err(AuthError::RefreshFailed { status: None, .. })));
    let pair = client.tokens().snapshot();
    assert_eq!(pair.access_token, "AT9");
    assert_eq!(pair.refresh_token, "RT9");
}

#[tokio::test]
async fn test_refresh_task_with_zero_interval_keeps_running() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let client = test_client(&server);

    let task = spawn_refresh_task(client, Duration::ZERO);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!task.is_finished());
    task.abort();
}

#[tokio::test]
async fn test_refresh_transport_failure_has_no_status() {
    let server = MockServer::start().await;
    let mut config = common::test_config(&server);
    config.token_url = "http://127.0.0.1:1/api/token".to_string();
    let client = SpotifyClient::new(config);
    client.tokens().replace(CredentialPair::new(
        "AT1".to_string(),
        "RT1".to_string(),
        String::new(),
        3600,
    ));

    let err = client.refresh().await.unwrap_err();
    assert!(matches!(err, AuthError::RefreshFailed { status: None, .. }));
    assert_eq!(client.tokens().require_access_token().unwrap(), "AT1");
}

#[tokio::test]
async fn test_refresh_if_expiring_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "AT2",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    assert_eq!(refresh_if_expiring(&client).await, RefreshOutcome::NotAuthorized);

    mount_code_exchange(&server, "AT1", "RT1").await;
    client.exchange_code("abc123").await.unwrap();
    assert_eq!(refresh_if_expiring(&client).await, RefreshOutcome::StillValid);

    client.tokens().replace(CredentialPair {
        access_token: "AT1".to_string(),
        refresh_token: "RT1".to_string(),
        scope: String::new(),
        expires_in: 3600,
        obtained_at: 0,
    });
    assert_eq!(refresh_if_expiring(&client).await, RefreshOutcome::Refreshed);
    assert_eq!(client.tokens().require_access_token().unwrap(), "AT2");
    assert_eq!(client.tokens().refresh_token().unwrap(), "RT1");
}

#[tokio::test]
async fn test_authorization_url_uses_configured_client() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    let url = client.authorization_url();
    let query = url.query().unwrap();

    assert!(url.as_str().starts_with("https://accounts.spotify.com/authorize?"));
    assert!(query.contains("client_id=client"));
    assert!(query.contains("response_type=code"));
    assert!(query.contains("scope=user-modify-playback-state+user-read-currently-playing"));
}
