use std::collections::HashMap;

use axum::{Extension, extract::Query, http::StatusCode, response::Json};
use serde_json::{Value, json};

use crate::{
    error::{PipelineError, StoreError},
    server::AppState,
};

/// GET /search - direct catalog track search for a connected user.
pub async fn search(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<Value>) {
    let Some(user_id) = params.get("user_id") else {
        return bad_request("user_id parameter required");
    };
    let Some(query) = params.get("q") else {
        return bad_request("q parameter required");
    };
    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<u32>().ok())
        .unwrap_or(10);

    let token = match state.pipeline.access_token_for(user_id).await {
        Ok(token) => token,
        Err(e) => return translate_token_error(e),
    };

    match state.pipeline.spotify.search_tracks(&token, query, limit).await {
        Ok(tracks) => (StatusCode::OK, Json(json!({ "tracks": tracks }))),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

/// GET /top-tracks - the listener's top tracks.
pub async fn top_tracks(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<Value>) {
    let Some(user_id) = params.get("user_id") else {
        return bad_request("user_id parameter required");
    };
    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<u32>().ok())
        .unwrap_or(20);

    let token = match state.pipeline.access_token_for(user_id).await {
        Ok(token) => token,
        Err(e) => return translate_token_error(e),
    };

    match state.pipeline.spotify.top_tracks(&token, limit).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items }))),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn translate_token_error(err: PipelineError) -> (StatusCode, Json<Value>) {
    match err {
        PipelineError::NotConnected | PipelineError::TokenRefreshFailed(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Spotify account is not connected",
                "needs_reconnect": true,
            })),
        ),
        PipelineError::Store(StoreError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": other.to_string() })),
        ),
    }
}
