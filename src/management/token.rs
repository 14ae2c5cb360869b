use chrono::{Duration, Utc};

use crate::{
    error::PipelineError,
    management::UserStore,
    spotify::SpotifyAuth,
    types::{TokenState, UserRecord},
};

/// Token lifecycle manager for a user's Spotify access token.
///
/// Compares the stored expiry against the current time and refreshes the
/// token through the refresh-token grant when it is stale, writing the new
/// state back both to the in-memory record and to the store. No mutual
/// exclusion is applied: two concurrent requests that both observe an
/// expired token will both refresh, which the provider tolerates; the last
/// persisted write wins.
pub struct TokenManager<'a> {
    auth: &'a SpotifyAuth,
    store: &'a dyn UserStore,
}

impl<'a> TokenManager<'a> {
    pub fn new(auth: &'a SpotifyAuth, store: &'a dyn UserStore) -> Self {
        TokenManager { auth, store }
    }

    /// Returns a valid access token for the user, refreshing first if the
    /// stored one has expired.
    ///
    /// # Errors
    ///
    /// - `NotConnected` - the record has no token state or an empty refresh
    ///   token; the user must (re-)authorize
    /// - `TokenRefreshFailed` - the exchange call failed; fatal for the run,
    ///   no fallback is composed at this layer
    /// - `Store` - the refreshed state could not be persisted
    pub async fn get_valid_token(&self, user: &mut UserRecord) -> Result<String, PipelineError> {
        let state = user.spotify.as_ref().ok_or(PipelineError::NotConnected)?;
        if state.refresh_token.is_empty() {
            return Err(PipelineError::NotConnected);
        }

        if Utc::now() < state.expires_at {
            return Ok(state.access_token.clone());
        }

        let tokens = self
            .auth
            .refresh_access_token(&state.refresh_token)
            .await
            .map_err(|e| PipelineError::TokenRefreshFailed(e.to_string()))?;

        let refreshed = TokenState {
            access_token: tokens.access_token,
            // the grant may rotate the refresh token or omit it entirely
            refresh_token: tokens
                .refresh_token
                .unwrap_or_else(|| state.refresh_token.clone()),
            expires_at: Utc::now() + Duration::seconds(tokens.expires_in as i64),
        };

        user.spotify = Some(refreshed.clone());
        self.store.update_tokens(&user.id, &refreshed).await?;

        Ok(refreshed.access_token)
    }
}
