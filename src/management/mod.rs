mod auth;
mod refresh;

pub use auth::TokenStore;
pub use refresh::EXPIRY_BUFFER_SECS;
pub use refresh::MIN_REFRESH_INTERVAL;
pub use refresh::RefreshOutcome;
pub use refresh::refresh_if_expiring;
pub use refresh::spawn_refresh_task;
