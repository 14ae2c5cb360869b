//! # CLI Module
//!
//! This module provides the command-line interface layer for the
//! recommendation service. The HTTP API is the primary surface; the CLI
//! exists to run the server, connect a Spotify account without a frontend,
//! and exercise the recommendation pipeline from a terminal.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the HTTP API server with the file-backed user store
//! - [`connect`] - Walks a user through the Spotify authorization flow:
//!   starts a temporary server for the OAuth callback, opens the
//!   authorization URL in the browser, and waits until the tokens land on
//!   the user record
//! - [`recommend`] - Runs the full pipeline for a stored user and prints
//!   the verified tracks as a table, optionally saving them as a playlist
//!
//! ## Error Handling Philosophy
//!
//! CLI commands are the one place where the process-exiting `error!` macro
//! is appropriate: a missing environment variable or an unusable user
//! store has no recovery path in a terminal session. Everything recoverable
//! is reported with `warning!` and the command continues.

mod connect;
mod recommend;
mod serve;

pub use connect::connect;
pub use recommend::recommend;
pub use serve::serve;
