use crate::{
    error::PipelineError,
    spotify::SpotifyApi,
    types::{AddTracksRequest, AddTracksResponse, CreatePlaylistRequest, CreatePlaylistResponse},
};

impl SpotifyApi {
    /// Creates a playlist owned by the given profile.
    ///
    /// The request carries name, description, and visibility; playlists are
    /// always created private. The description must already satisfy the
    /// provider's 300-character limit (see `utils::truncate_description`).
    ///
    /// # Errors
    ///
    /// A 403 response surfaces as `Forbidden`, which the route layer maps to
    /// a reconnect hint: it usually means the stored token predates the
    /// playlist-modify scopes.
    pub async fn create_playlist(
        &self,
        token: &str,
        profile_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, PipelineError> {
        let api_url = format!(
            "{uri}/users/{id}/playlists",
            uri = self.api_url,
            id = profile_id
        );
        self.call(self.http.post(&api_url).bearer_auth(token).json(request))
            .await
    }

    /// Adds track URIs to an existing playlist.
    ///
    /// The provider accepts at most 100 URIs per call; the materializer
    /// chunks larger lists and calls this once per chunk.
    pub async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTracksResponse, PipelineError> {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks",
            uri = self.api_url,
            id = playlist_id
        );
        let request = AddTracksRequest {
            uris: uris.to_vec(),
        };
        self.call(self.http.post(&api_url).bearer_auth(token).json(&request))
            .await
    }
}
