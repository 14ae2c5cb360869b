use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::{config, error::PipelineError};

/// Hard timeout applied to every catalog API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Shorter timeout for token-exchange calls.
pub const TOKEN_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle for authenticated Spotify Web API calls.
///
/// Holds a shared HTTP client and the API base URL. All calls go through
/// [`SpotifyApi::call`], which applies the default timeout and classifies
/// failures uniformly; endpoint-specific methods live in the sibling
/// modules (`search`, `me`, `playlist`).
#[derive(Debug, Clone)]
pub struct SpotifyApi {
    pub(crate) http: Client,
    pub(crate) api_url: String,
}

impl SpotifyApi {
    pub fn new(api_url: String) -> Self {
        SpotifyApi {
            http: Client::new(),
            api_url,
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::spotify_api_url())
    }

    /// Sends a prepared request with the default timeout and decodes the
    /// JSON body of a successful response.
    ///
    /// # Errors
    ///
    /// - `UpstreamTimeout` - the call exceeded [`DEFAULT_TIMEOUT`]
    /// - `AuthExpired` - the API answered 401
    /// - `Forbidden` - the API answered 403
    /// - `RateLimited` - the API answered 429
    /// - `Upstream` - any other non-2xx status, with status and body text
    /// - `Transport` - connection or decoding failures
    ///
    /// No retries happen here; callers decide whether a failure is a miss
    /// or a fatal condition.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, PipelineError> {
        let response = request
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await
            .map_err(PipelineError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        response.json::<T>().await.map_err(PipelineError::from_transport)
    }
}

/// Maps a non-2xx status onto the pipeline error taxonomy.
pub(crate) fn classify_status(status: StatusCode, body: String) -> PipelineError {
    match status {
        StatusCode::UNAUTHORIZED => PipelineError::AuthExpired,
        StatusCode::FORBIDDEN => PipelineError::Forbidden,
        StatusCode::TOO_MANY_REQUESTS => PipelineError::RateLimited,
        _ => PipelineError::Upstream {
            status: status.as_u16(),
            body,
        },
    }
}
