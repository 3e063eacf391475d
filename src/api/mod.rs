//! # API Module
//!
//! HTTP endpoints served by tunebridge. Every handler receives the shared
//! [`crate::spotify::SpotifyClient`] through an axum `Extension` and
//! translates its errors into a status code and a short plain-text message.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - `302` redirect to Spotify's consent page.
//! - [`callback`] - exchanges the authorization code for the token pair.
//!
//! ### Player
//!
//! - [`now_playing`] - `"Artist - Track"` for the current track.
//! - [`previous`] / [`next`] - skip backward or forward.
//! - [`beat`] - beat start times and tempo of the current track as JSON.
//!
//! ### Monitoring
//!
//! - [`health`] - status, version and whether a login has completed.
//!
//! ## Status Codes
//!
//! | Failure | Status |
//! |---|---|
//! | no login yet | `401` |
//! | Spotify rejected the access token | `401` |
//! | missing or denied authorization code | `400` |
//! | token exchange or Spotify call failed | `502` |
//!
//! "Nothing playing" is a `200` with an idle text, not a failure.

mod callback;
mod health;
mod player;

pub use callback::callback;
pub use callback::login;
pub use health::health;
pub use player::ApiError;
pub use player::IDLE_TEXT;
pub use player::LOGIN_REQUIRED_TEXT;
pub use player::SESSION_REJECTED_TEXT;
pub use player::beat;
pub use player::next;
pub use player::now_playing;
pub use player::previous;
