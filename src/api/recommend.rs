use axum::{Extension, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::{PipelineError, StoreError},
    pipeline::fallback::fallback_response,
    server::AppState,
    types::{ChatMessage, RecommendationContext, TrackObject},
    warning,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: String,
    pub prompt: String,
    #[serde(default)]
    pub current_playlist: Vec<TrackObject>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default = "default_target_count")]
    pub target_count: usize,
}

fn default_target_count() -> usize {
    12
}

/// POST /recommendations - run the pipeline for a listener request.
///
/// Success and fallback both answer 200; the client distinguishes them via
/// the `fallback` flag. Missing authorization answers 401 with a reconnect
/// hint, an unknown user 404. Any other systemic failure still degrades to
/// the fallback shape rather than an opaque 500.
pub async fn recommend(
    Extension(state): Extension<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> (StatusCode, Json<Value>) {
    let ctx = RecommendationContext {
        prompt: request.prompt,
        current_playlist: request.current_playlist,
        history: request.history,
        taste_profile: Vec::new(),
    };

    match state
        .pipeline
        .generate_recommendations(&request.user_id, ctx, request.target_count)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome.into_json())),
        Err(PipelineError::NotConnected) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Spotify account is not connected",
                "needs_reconnect": true,
            })),
        ),
        Err(PipelineError::TokenRefreshFailed(reason)) => {
            warning!("Token refresh failed for {}: {}", request.user_id, reason);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Failed to refresh Spotify authentication",
                    "needs_reconnect": true,
                })),
            )
        }
        Err(PipelineError::Store(StoreError::NotFound(_))) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        ),
        Err(e) => {
            warning!("Recommendation run failed: {}", e);
            (
                StatusCode::OK,
                Json(fallback_response(
                    "Unable to generate music recommendations at the moment.",
                    json!({
                        "explanation": "Music recommendations temporarily unavailable.",
                        "error": e.to_string(),
                    }),
                )),
            )
        }
    }
}
