use axum::{Extension, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::{PipelineError, StoreError},
    server::AppState,
    warning,
};

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistBody {
    pub user_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub uris: Vec<String>,
}

/// POST /playlists - materialize an ordered URI list as a playlist.
///
/// No degraded result can be composed here, so failures map to stable
/// error statuses instead of the fallback shape: 401 when the account is
/// not connected, 403 with a reconnect hint when the stored token lacks
/// the playlist scopes, 502 when the provider rejects the creation.
/// Partial batch failures are not errors; the response reports how many
/// tracks actually landed.
pub async fn create_playlist(
    Extension(state): Extension<AppState>,
    Json(body): Json<CreatePlaylistBody>,
) -> (StatusCode, Json<Value>) {
    match state
        .pipeline
        .create_playlist(&body.user_id, body.name, body.description, body.uris)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "playlist_id": report.playlist_id,
                "requested": report.requested,
                "added": report.added,
                "message": "Playlist created successfully",
            })),
        ),
        Err(PipelineError::NotConnected) | Err(PipelineError::TokenRefreshFailed(_)) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Spotify account is not connected",
                "needs_reconnect": true,
            })),
        ),
        Err(PipelineError::Store(StoreError::NotFound(_))) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        ),
        Err(PipelineError::Forbidden) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "Spotify permissions missing. Please reconnect your Spotify account \
                          to grant playlist creation permissions.",
                "needs_reconnect": true,
            })),
        ),
        Err(e) => {
            warning!("Playlist creation failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}
