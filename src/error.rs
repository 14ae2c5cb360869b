use thiserror::Error;

/// Error taxonomy for the recommendation pipeline.
///
/// The variants split into two severity classes. `NotConnected`,
/// `TokenRefreshFailed`, `SuggestionFailed`, `PlaylistCreateFailed` and
/// `Store` are systemic: they abort the run and propagate to the route
/// boundary. The upstream classification variants (`UpstreamTimeout`,
/// `AuthExpired`, `Forbidden`, `RateLimited`, `Upstream`) are fatal only
/// where they occur outside the resolution loop; a candidate search that
/// fails with any of them is absorbed as a miss by the resolver.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Spotify account is not connected")]
    NotConnected,

    #[error("failed to refresh Spotify access token: {0}")]
    TokenRefreshFailed(String),

    #[error("upstream request timed out")]
    UpstreamTimeout,

    #[error("Spotify authentication expired")]
    AuthExpired,

    #[error("Spotify access forbidden")]
    Forbidden,

    #[error("Spotify rate limit exceeded")]
    RateLimited,

    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("suggestion request failed ({status}): {body}")]
    SuggestionFailed { status: u16, body: String },

    #[error("failed to create playlist: {0}")]
    PlaylistCreateFailed(String),

    #[error("user store error: {0}")]
    Store(#[from] StoreError),

    #[error("http transport error: {0}")]
    Transport(reqwest::Error),
}

impl PipelineError {
    /// Classifies a reqwest transport failure, mapping hit timeouts onto the
    /// `UpstreamTimeout` variant so callers never need to inspect the inner
    /// error to detect a cancelled call.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PipelineError::UpstreamTimeout
        } else {
            PipelineError::Transport(err)
        }
    }
}

/// Errors raised by [`crate::management::UserStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
