//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! recommendation pipeline. It handles HTTP communication, OAuth token
//! exchange, catalog search, and playlist management, abstracting away the
//! API's quirks behind a small set of typed operations.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (Pipeline, API routes, CLI)
//!          ↓
//! Spotify Integration Layer
//!     ├── Client (bounded-timeout calls, error classification)
//!     ├── Authentication (authorization-code flow, refresh grant)
//!     ├── Catalog Search (candidate verification)
//!     ├── Profile & Top Tracks (listener identity and taste)
//!     └── Playlist Operations (create, batched track adds)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`client`] - The [`client::SpotifyApi`] handle. Every outbound call is
//!   bounded by a hard timeout and every non-2xx response is classified into
//!   the pipeline error taxonomy (401 auth-expired, 403 forbidden, 429
//!   rate-limited, anything else an upstream error carrying status and body).
//!   The client never retries; retry and skip policies belong to callers.
//! - [`auth`] - OAuth 2.0 authorization-code flow for connecting an account
//!   and the refresh-token grant used by the token lifecycle manager. Token
//!   exchange calls authenticate with a Basic header built from the client
//!   id and secret, and run under a shorter timeout than catalog calls.
//! - [`search`] - Free-text track search used to verify AI-suggested
//!   candidate lines against the real catalog.
//! - [`me`] - Current-user profile (needed for the playlist create path) and
//!   top tracks (used to build a taste profile for the suggestion prompt).
//! - [`playlist`] - Playlist creation and track addition. Track adds are
//!   limited to 100 URIs per call by the provider; batching above that limit
//!   is handled by the pipeline's materializer.
//!
//! ## Error Handling
//!
//! All operations return `Result<_, PipelineError>`. The classification done
//! here is what lets the catalog resolver decide per-error whether to treat
//! a failure as a miss (skip and continue) or to escalate: the variants are
//! uniform regardless of which endpoint produced them.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - authorization-code and refresh-token grants
//! - `GET /search` - track search with `type=track` and a result limit
//! - `GET /me` - current user's profile id
//! - `GET /me/top/tracks` - the listener's top tracks
//! - `POST /users/{user_id}/playlists` - create a private playlist
//! - `POST /playlists/{playlist_id}/tracks` - add up to 100 track URIs

pub mod auth;
pub mod client;
pub mod me;
pub mod playlist;
pub mod search;

pub use auth::SpotifyAuth;
pub use client::SpotifyApi;
