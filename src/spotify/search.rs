use crate::{
    error::PipelineError,
    spotify::SpotifyApi,
    types::{SearchResponse, TrackObject},
};

impl SpotifyApi {
    /// Searches the catalog for tracks matching a free-text query.
    ///
    /// Issues a bounded `GET /search` with `type=track` and the given result
    /// limit, returning the matching tracks in the API's relevance order.
    /// An empty result set is not an error; the resolver treats it as a
    /// miss for the candidate that produced the query.
    ///
    /// # Example
    ///
    /// ```
    /// let results = api.search_tracks(&token, "Harvest Moon by Neil Young", 3).await?;
    /// if let Some(track) = results.first() {
    ///     println!("top match: {}", track.name);
    /// }
    /// ```
    pub async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackObject>, PipelineError> {
        let api_url = format!("{uri}/search", uri = self.api_url);
        let limit = limit.to_string();
        let request = self
            .http
            .get(&api_url)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .bearer_auth(token);

        let response: SearchResponse = self.call(request).await?;
        Ok(response.tracks.map(|t| t.items).unwrap_or_default())
    }
}
