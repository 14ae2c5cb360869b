use crate::{
    error::PipelineError,
    info,
    spotify::SpotifyApi,
    types::CreatePlaylistRequest,
    utils, warning,
};

/// Provider limit on track URIs per add-tracks call.
pub const MAX_TRACKS_PER_ADD: usize = 100;

/// What actually happened during materialization.
///
/// `added` can be lower than `requested` after a partial batch failure;
/// that is an accepted degraded outcome, not an error.
#[derive(Debug, Clone)]
pub struct MaterializeReport {
    pub playlist_id: String,
    pub requested: usize,
    pub added: usize,
}

/// Creates a playlist and attaches the given track URIs in order.
///
/// The description is truncated to the provider's 300-character limit
/// before creation. URIs are added in chunks of at most
/// [`MAX_TRACKS_PER_ADD`]; a failed chunk is logged and skipped while the
/// remaining chunks still run, so the playlist may end up smaller than
/// requested. Only profile resolution and playlist creation are fatal.
pub async fn materialize(
    api: &SpotifyApi,
    token: &str,
    name: &str,
    description: &str,
    uris: &[String],
) -> Result<MaterializeReport, PipelineError> {
    let profile = api.profile(token).await?;

    let request = CreatePlaylistRequest {
        name: name.to_string(),
        description: utils::truncate_description(description),
        public: false,
    };

    let playlist = api
        .create_playlist(token, &profile.id, &request)
        .await
        .map_err(|e| match e {
            // keep the scope signal intact for the route layer's reconnect hint
            PipelineError::Forbidden => PipelineError::Forbidden,
            other => PipelineError::PlaylistCreateFailed(other.to_string()),
        })?;

    info!("Adding {} tracks to playlist {}", uris.len(), playlist.id);

    let mut added = 0usize;
    for (index, chunk) in uris.chunks(MAX_TRACKS_PER_ADD).enumerate() {
        match api.add_tracks(token, &playlist.id, chunk).await {
            Ok(_) => {
                info!("Added batch {}: {} tracks", index + 1, chunk.len());
                added += chunk.len();
            }
            Err(e) => {
                warning!("Failed to add tracks batch {}: {}", index + 1, e);
            }
        }
    }

    Ok(MaterializeReport {
        playlist_id: playlist.id,
        requested: uris.len(),
        added,
    })
}
