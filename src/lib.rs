//! AI-Assisted Playlist Recommendation Service Library
//!
//! This library provides the building blocks of a backend service that turns
//! free-form listener requests into verified Spotify playlists. An LLM
//! proposes candidate songs, each candidate is verified against the Spotify
//! catalog via search, and the verified tracks are either returned to the
//! caller or materialized as a playlist on the listener's account.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints served by the recommendation server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy for the recommendation pipeline
//! - `groq` - Groq chat-completions client for song suggestions
//! - `management` - User records, token lifecycle, and persistence
//! - `pipeline` - The suggestion/resolution/materialization pipeline
//! - `server` - HTTP server wiring
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tunesmith::{cli, config};
//!
//! #[tokio::main]
//! async fn main() -> tunesmith::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod groq;
pub mod management;
pub mod pipeline;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for CLI plumbing using a boxed
/// dynamic error trait object while maintaining Send + Sync bounds for async
/// contexts. Pipeline code uses the typed [`error::PipelineError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Resolving {} candidates", count);
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
/// successful completion of operations.
///
/// # Example
///
/// ```
/// success!("Playlist created with {} tracks", count);
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
/// terminates the program with exit code 1. Reserved for unrecoverable CLI
/// failures (missing configuration, unusable user store); server and pipeline
/// code reports errors through [`error::PipelineError`] instead of exiting.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
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
/// potential issues that don't require program termination, such as a failed
/// candidate search that the resolver absorbs and skips.
///
/// # Example
///
/// ```
/// warning!("No match found for: {}", candidate);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
