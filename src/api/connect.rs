use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, Json},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use crate::{server::AppState, types::TokenState, utils, warning};

/// Issues the Spotify authorization URL for a user.
///
/// Generates a random `state` nonce, remembers which user it belongs to,
/// and returns the URL the frontend (or the CLI) sends the listener to.
/// The user record must already exist; tokens from the eventual callback
/// have to land somewhere.
pub async fn authorize(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(user_id) = params.get("user_id") else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "user_id parameter required" })),
        ));
    };

    match state.pipeline.store.get(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "User not found" })),
            ));
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            ));
        }
    }

    let nonce = utils::generate_state_nonce();
    state
        .pending
        .lock()
        .await
        .insert(nonce.clone(), user_id.clone());

    let auth_url = state.pipeline.auth.authorize_url(&nonce);
    Ok(Json(json!({ "auth_url": auth_url })))
}

/// Handles the OAuth redirect back from Spotify.
///
/// Looks up the pending `state` nonce, exchanges the authorization code
/// for a token pair, and persists the resulting token state on the user
/// record that initiated the flow. Responds with a small HTML page since
/// the listener arrives here in a browser.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
) -> Html<String> {
    if let Some(error) = params.get("error") {
        return Html(format!("<h4>Authorization failed: {error}.</h4>"));
    }

    let (Some(code), Some(nonce)) = (params.get("code"), params.get("state")) else {
        return Html("<h4>Missing code or state parameter.</h4>".to_string());
    };

    let Some(user_id) = state.pending.lock().await.remove(nonce) else {
        return Html("<h4>Unknown or expired authorization state.</h4>".to_string());
    };

    match state.pipeline.auth.exchange_code(code).await {
        Ok(tokens) => {
            let token_state = TokenState {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token.unwrap_or_default(),
                expires_at: Utc::now() + Duration::seconds(tokens.expires_in as i64),
            };

            match state
                .pipeline
                .store
                .update_tokens(&user_id, &token_state)
                .await
            {
                Ok(()) => {
                    Html("<h2>Spotify connected.</h2><p>Close browser window.</p>".to_string())
                }
                Err(e) => {
                    warning!("Failed to store tokens for {}: {}", user_id, e);
                    Html("<h4>Connection failed.</h4>".to_string())
                }
            }
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Connection failed.</h4>".to_string())
        }
    }
}
