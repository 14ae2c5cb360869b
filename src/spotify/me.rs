use crate::{
    error::PipelineError,
    spotify::SpotifyApi,
    types::{TopTracksResponse, TrackObject, UserProfile},
};

impl SpotifyApi {
    /// Fetches the authenticated listener's profile.
    ///
    /// The profile id is the owner segment of the playlist-create path, so
    /// the materializer resolves it before creating a playlist.
    pub async fn profile(&self, token: &str) -> Result<UserProfile, PipelineError> {
        let api_url = format!("{uri}/me", uri = self.api_url);
        self.call(self.http.get(&api_url).bearer_auth(token)).await
    }

    /// Fetches the listener's top tracks.
    ///
    /// Used to build a taste profile for the suggestion prompt when the
    /// caller supplies no current playlist. Failures here are absorbed by
    /// the pipeline; a missing taste profile only degrades prompt quality.
    pub async fn top_tracks(
        &self,
        token: &str,
        limit: u32,
    ) -> Result<Vec<TrackObject>, PipelineError> {
        let api_url = format!(
            "{uri}/me/top/tracks?limit={limit}",
            uri = self.api_url,
            limit = limit
        );
        let response: TopTracksResponse = self.call(self.http.get(&api_url).bearer_auth(token)).await?;
        Ok(response.items)
    }
}
