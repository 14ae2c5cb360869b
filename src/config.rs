//! Configuration management for the recommendation service.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Spotify and Groq credentials,
//! upstream endpoint URLs, and server settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults for upstream URLs and model selection
//!
//! Credentials (`SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, `GROQ_API_KEY`)
//! have no defaults and panic when missing; everything else falls back to the
//! real upstream endpoints so a minimal `.env` is enough to run the service.

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `tunesmith/.env` under the platform-specific
/// local data directory. When no file exists there, falls back to a `.env`
/// in the current working directory, and finally to the process environment.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/tunesmith/.env`
/// - macOS: `~/Library/Application Support/tunesmith/.env`
/// - Windows: `%LOCALAPPDATA%/tunesmith/.env`
///
/// # Errors
///
/// Returns an error string if the parent directory cannot be created.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunesmith/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(path).map_err(|e| e.to_string())?;
    } else {
        // fall back to a .env in the working directory, if any
        dotenv::dotenv().ok();
    }
    Ok(())
}

/// Returns the address the HTTP API server binds to.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Spotify application client ID.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_CLIENT_ID").expect("SPOTIFY_CLIENT_ID must be set")
}

/// Returns the Spotify application client secret.
///
/// Used together with the client ID to build the Basic authorization header
/// for token-exchange calls.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_SECRET` environment variable is not set.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_client_secret() -> String {
    env::var("SPOTIFY_CLIENT_SECRET").expect("SPOTIFY_CLIENT_SECRET must be set")
}

/// Returns the OAuth redirect URI registered with the Spotify application.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_REDIRECT_URI")
        .unwrap_or_else(|_| "http://127.0.0.1:3001/spotify/callback".to_string())
}

/// Returns the scope string requested during Spotify authorization.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_SCOPE").unwrap_or_else(|_| {
        [
            "user-read-private",
            "user-read-email",
            "user-top-read",
            "playlist-read-private",
            "playlist-modify-private",
            "playlist-modify-public",
        ]
        .join(" ")
    })
}

/// Returns the Spotify Web API base URL.
pub fn spotify_api_url() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_auth_url() -> String {
    env::var("SPOTIFY_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string())
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_token_url() -> String {
    env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the Groq API key used for chat-completions calls.
///
/// # Panics
///
/// Panics if the `GROQ_API_KEY` environment variable is not set.
pub fn groq_api_key() -> String {
    env::var("GROQ_API_KEY").expect("GROQ_API_KEY must be set")
}

/// Returns the Groq chat-completions endpoint URL.
pub fn groq_api_url() -> String {
    env::var("GROQ_API_URL")
        .unwrap_or_else(|_| "https://api.groq.com/openai/v1/chat/completions".to_string())
}

/// Returns the model identifier used for suggestion and explanation calls.
pub fn groq_model() -> String {
    env::var("GROQ_MODEL").unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string())
}

/// Returns the frontend base URL the connect flow redirects back to.
pub fn frontend_url() -> String {
    env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
