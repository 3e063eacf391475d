use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The access/refresh token pair held by [`crate::management::TokenStore`].
///
/// An empty `access_token` means "not authenticated"; an empty
/// `refresh_token` means no authorization has completed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl CredentialPair {
    pub fn new(access_token: String, refresh_token: String, scope: String, expires_in: u64) -> Self {
        Self {
            access_token,
            refresh_token,
            scope,
            expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        }
    }

    /// True when the access token expires within `buffer_secs`.
    ///
    /// A pair without expiry metadata is never considered expiring.
    pub fn expires_within(&self, buffer_secs: u64, now: u64) -> bool {
        if self.access_token.is_empty() || self.expires_in == 0 {
            return false;
        }
        now + buffer_secs >= self.obtained_at + self.expires_in
    }
}

/// Credentials that authenticate the token-exchange request itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: BTreeSet<String>,
}

/// Body of `POST /api/token` for both grant types.
///
/// Every field is optional so a 200 with a missing token can be reported as
/// a failed exchange instead of a decode error.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    pub item: Option<PlayingItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayingItem {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ItemArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioAnalysisResponse {
    #[serde(default)]
    pub beats: Vec<TimeInterval>,
    pub track: AnalysisTrack,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeInterval {
    pub start: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisTrack {
    pub tempo: f64,
}

/// What the player is doing right now.
#[derive(Debug, Clone, PartialEq)]
pub enum NowPlaying {
    Idle,
    Playing(PlayingTrack),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayingTrack {
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<String>,
}

impl std::fmt::Display for PlayingTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.artists.is_empty() {
            return write!(f, "{}", self.name);
        }
        write!(f, "{} - {}", self.artists.join(", "), self.name)
    }
}

/// Beat start times (seconds, in track order) and the track tempo in BPM.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RhythmAnalysis {
    pub beats: Vec<f64>,
    pub tempo: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BeatReport {
    Idle,
    Analysis(RhythmAnalysis),
}
