//! tunebridge library
//!
//! A small backend that brokers one Spotify account for a client application.
//! It runs the OAuth authorization-code flow, keeps the resulting token pair in
//! memory, refreshes the access token, and proxies a handful of simplified
//! player endpoints (now playing, skip, beat analysis) to the Spotify Web API.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and error-to-status translation
//! - `config` - Configuration from environment variables and `.env` files
//! - `error` - Error taxonomy for the credential lifecycle and the proxy
//! - `management` - In-memory token store and background refresh
//! - `server` - Router and HTTP server
//! - `spotify` - Spotify accounts and Web API client
//! - `types` - Data structures and Spotify payload shapes
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tunebridge::{config::{self, SpotifyConfig}, server, spotify::SpotifyClient};
//!
//! #[tokio::main]
//! async fn main() -> tunebridge::Res<()> {
//!     config::load_env().await?;
//!     let config = SpotifyConfig::from_env()?;
//!     let addr = config.server_addr;
//!     server::start_api_server(Arc::new(SpotifyClient::new(config)), addr).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;

/// A convenient Result type alias for process-level glue.
///
/// Used where errors of several kinds meet (startup, server loop) and are
/// only reported, never matched on. Components with recoverable failures
/// return the typed errors from [`error`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Server running at http://{}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Access token refreshed.");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Reserved for startup failures in
/// the binary; request handling never calls it.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// error!("Cannot bind {}: {}", addr, e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("Token exchange failed: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
