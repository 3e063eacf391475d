//! Configuration management for tunebridge.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files. The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the working directory
//! 3. `.env` in the local data directory
//! 4. Application defaults (where applicable)
//!
//! The server reads them once at startup through [`SpotifyConfig::from_env`]
//! and shares the resulting immutable value.

use std::{collections::BTreeSet, env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use reqwest::Url;

use crate::{
    error::ConfigError,
    types::{AuthorizationRequest, ClientCredentials},
};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "user-read-currently-playing user-read-playback-state user-library-read user-modify-playback-state";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

const CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
const CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
const REDIRECT_URI: &str = "SPOTIFY_REDIRECT_URI";
const AUTH_SCOPE: &str = "SPOTIFY_AUTH_SCOPE";
const AUTH_URL: &str = "SPOTIFY_AUTH_URL";
const TOKEN_URL: &str = "SPOTIFY_TOKEN_URL";
const API_URL: &str = "SPOTIFY_API_URL";
const SERVER_ADDRESS: &str = "SERVER_ADDRESS";
const REFRESH_INTERVAL: &str = "TOKEN_REFRESH_INTERVAL_SECS";

/// Loads environment variables from `.env` files.
///
/// Reads `./.env` first, then `.env` in the platform-specific local data
/// directory under `tunebridge/.env`. Variables already present in the
/// environment are never overridden, and a missing file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/tunebridge/.env`
/// - macOS: `~/Library/Application Support/tunebridge/.env`
/// - Windows: `%LOCALAPPDATA%/tunebridge/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(e.to_string());
        }
    }

    let path = data_env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunebridge/.env");
    path
}

/// Immutable settings shared by the server, the authorization flow and the
/// proxy operations.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub credentials: ClientCredentials,
    pub redirect_uri: String,
    pub scopes: BTreeSet<String>,
    pub auth_url: Url,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: SocketAddr,
    /// Period of the background refresh check. `None` disables the task.
    pub refresh_interval: Option<Duration>,
}

impl SpotifyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let server_addr_raw = get_or(SERVER_ADDRESS, DEFAULT_SERVER_ADDRESS);
        let server_addr =
            SocketAddr::from_str(&server_addr_raw).map_err(|e| ConfigError::Invalid {
                name: SERVER_ADDRESS,
                value: server_addr_raw.clone(),
                reason: e.to_string(),
            })?;

        let auth_url_raw = get_or(AUTH_URL, DEFAULT_AUTH_URL);
        let auth_url = Url::parse(&auth_url_raw).map_err(|e| ConfigError::Invalid {
            name: AUTH_URL,
            value: auth_url_raw.clone(),
            reason: e.to_string(),
        })?;

        let refresh_interval = match lookup(REFRESH_INTERVAL) {
            None => Some(Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS)),
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: REFRESH_INTERVAL,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Self {
            credentials: ClientCredentials {
                client_id: get_required(CLIENT_ID)?,
                client_secret: get_required(CLIENT_SECRET)?,
            },
            redirect_uri: get_required(REDIRECT_URI)?,
            scopes: parse_scopes(&get_or(AUTH_SCOPE, DEFAULT_SCOPE)),
            auth_url,
            token_url: get_or(TOKEN_URL, DEFAULT_TOKEN_URL),
            api_url: trim_trailing_slash(get_or(API_URL, DEFAULT_API_URL)),
            server_addr,
            refresh_interval,
        })
    }

    pub fn authorization_request(&self) -> AuthorizationRequest {
        AuthorizationRequest {
            client_id: self.credentials.client_id.clone(),
            redirect_uri: self.redirect_uri.clone(),
            scopes: self.scopes.clone(),
        }
    }
}

/// Splits a scope string on whitespace or commas into a set.
pub fn parse_scopes(raw: &str) -> BTreeSet<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
