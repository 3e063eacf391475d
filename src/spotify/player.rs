use reqwest::{Method, StatusCode};

use crate::{
    error::ProxyError,
    types::{
        AudioAnalysisResponse, BeatReport, CurrentlyPlayingResponse, NowPlaying, PlayingTrack,
        RhythmAnalysis,
    },
};

use super::SpotifyClient;

/// Skip direction for [`SpotifyClient::skip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipDirection {
    Next,
    Previous,
}

impl SkipDirection {
    fn endpoint(self) -> &'static str {
        match self {
            SkipDirection::Next => "/me/player/next",
            SkipDirection::Previous => "/me/player/previous",
        }
    }
}

impl SpotifyClient {
    /// Fetches what the user is listening to.
    ///
    /// Spotify answers `204 No Content` when no device is active and
    /// `item: null` during ads or between tracks; both map to
    /// [`NowPlaying::Idle`], which is not an error.
    ///
    /// # API Endpoint
    ///
    /// `GET /me/player/currently-playing`
    pub async fn now_playing(&self) -> Result<NowPlaying, ProxyError> {
        let response = self
            .api_request(Method::GET, "/me/player/currently-playing")
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(NowPlaying::Idle);
        }

        let body = response.text().await.map_err(|e| ProxyError::UpstreamFailed {
            status: Some(status.as_u16()),
            payload: e.to_string(),
        })?;
        if body.trim().is_empty() {
            return Ok(NowPlaying::Idle);
        }

        let playing: CurrentlyPlayingResponse =
            serde_json::from_str(&body).map_err(|e| ProxyError::UpstreamFailed {
                status: Some(status.as_u16()),
                payload: format!("unexpected currently-playing payload ({}): {}", e, body),
            })?;

        Ok(match playing.item {
            None => NowPlaying::Idle,
            Some(item) => NowPlaying::Playing(PlayingTrack {
                id: item.id,
                name: item.name,
                artists: item.artists.into_iter().map(|a| a.name).collect(),
            }),
        })
    }

    /// Skips to the next or previous track. Any 2xx counts as success.
    ///
    /// # API Endpoint
    ///
    /// `POST /me/player/next` or `POST /me/player/previous` with an empty body.
    pub async fn skip(&self, direction: SkipDirection) -> Result<(), ProxyError> {
        self.api_request(Method::POST, direction.endpoint()).await?;
        Ok(())
    }

    /// Beat start times and tempo of the current track.
    ///
    /// Runs two dependent calls in sequence: [`Self::now_playing`] for the
    /// track id, then the audio analysis for that id. When nothing is playing
    /// the analysis endpoint is never called and [`BeatReport::Idle`] is
    /// returned.
    ///
    /// # API Endpoints
    ///
    /// - `GET /me/player/currently-playing`
    /// - `GET /audio-analysis/{id}`
    pub async fn rhythm_analysis(&self) -> Result<BeatReport, ProxyError> {
        let track = match self.now_playing().await? {
            NowPlaying::Idle => return Ok(BeatReport::Idle),
            NowPlaying::Playing(track) => track,
        };

        // Local files have no Spotify id and no analysis.
        let Some(track_id) = track.id else {
            return Err(ProxyError::UpstreamFailed {
                status: None,
                payload: format!("\"{}\" has no Spotify track id to analyze", track.name),
            });
        };

        let response = self
            .api_request(Method::GET, &format!("/audio-analysis/{}", track_id))
            .await?;
        let status = response.status();
        let analysis: AudioAnalysisResponse =
            response.json().await.map_err(|e| ProxyError::UpstreamFailed {
                status: Some(status.as_u16()),
                payload: format!("unexpected audio-analysis payload: {}", e),
            })?;

        Ok(BeatReport::Analysis(RhythmAnalysis {
            beats: analysis.beats.into_iter().map(|beat| beat.start).collect(),
            tempo: analysis.track.tempo,
        }))
    }
}
