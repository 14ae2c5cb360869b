//! # API Module
//!
//! This module provides the HTTP endpoints of the recommendation service.
//! It is the translation boundary between the pipeline's typed errors and
//! what callers actually see: stable JSON bodies with stable status codes,
//! or the fallback shape with a 200, never a raw panic or an opaque 500
//! for upstream flakiness.
//!
//! ## Endpoints
//!
//! ### Connect flow
//!
//! - [`authorize`] - issues the Spotify authorization URL for a user,
//!   binding a random `state` nonce to the user record.
//! - [`callback`] - handles the redirect back from Spotify, exchanges the
//!   authorization code and stores the token state on the user record.
//!
//! ### Recommendation pipeline
//!
//! - [`recommend`] - runs the full pipeline for a listener request and
//!   returns verified tracks with an explanation, or the fallback shape.
//! - [`create_playlist`] - materializes an ordered URI list as a private
//!   playlist on the listener's account.
//!
//! ### Pass-throughs
//!
//! - [`search`] - direct catalog track search.
//! - [`top_tracks`] - the listener's top tracks.
//!
//! ### Monitoring
//!
//! - [`health`] - application status and version for monitoring systems.
//!
//! ## Error translation
//!
//! Missing authorization is the only condition surfaced as a 4xx from the
//! recommendation route (`401` with a reconnect hint); an unknown user is
//! a `404`. Everything upstream-shaped degrades to the fallback payload.
//! The playlist route cannot compose a degraded result, so it uses stable
//! error statuses instead: `403` with a reconnect hint for insufficient
//! scope, `502` for creation failures.

mod connect;
mod health;
mod playlist;
mod recommend;
mod tracks;

pub use connect::authorize;
pub use connect::callback;
pub use health::health;
pub use playlist::create_playlist;
pub use recommend::recommend;
pub use tracks::search;
pub use tracks::top_tracks;
