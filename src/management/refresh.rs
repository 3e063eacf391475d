//! Background access-token refresh.
//!
//! Ticks at a fixed interval and refreshes the access token once it is within
//! [`EXPIRY_BUFFER_SECS`] of expiring. The task talks to the token store only
//! through [`SpotifyClient::refresh`], never by touching the pair directly.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::{error::AuthError, info, spotify::SpotifyClient, warning};

/// Refresh this many seconds before the access token expires.
pub const EXPIRY_BUFFER_SECS: u64 = 240;

/// Shortest tick the refresh loop accepts.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No login has completed yet.
    NotAuthorized,
    /// The current token is not close to expiring.
    StillValid,
    Refreshed,
    Failed(AuthError),
}

/// Refreshes the access token if it expires within [`EXPIRY_BUFFER_SECS`].
///
/// A failure is reported, logged and left for the next tick; the stored pair
/// stays as it was.
pub async fn refresh_if_expiring(client: &SpotifyClient) -> RefreshOutcome {
    let pair = client.tokens().snapshot();
    if pair.refresh_token.is_empty() {
        return RefreshOutcome::NotAuthorized;
    }

    let now = Utc::now().timestamp() as u64;
    if !pair.expires_within(EXPIRY_BUFFER_SECS, now) {
        return RefreshOutcome::StillValid;
    }

    match client.refresh().await {
        Ok(()) => RefreshOutcome::Refreshed,
        Err(e) => {
            warning!("Automatic token refresh failed: {}", e);
            RefreshOutcome::Failed(e)
        }
    }
}

/// Spawns the periodic refresh loop on the current runtime.
///
/// The first check runs one `interval` after spawning. A zero `interval` is
/// raised to [`MIN_REFRESH_INTERVAL`].
pub fn spawn_refresh_task(client: Arc<SpotifyClient>, interval: Duration) -> JoinHandle<()> {
    let interval = interval.max(MIN_REFRESH_INTERVAL);
    info!("Token refresh check every {}s", interval.as_secs());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            refresh_if_expiring(&client).await;
        }
    })
}
