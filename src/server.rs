use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{collections::HashMap, net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, error, pipeline::Pipeline};

/// Shared state handed to every route handler.
///
/// `pending` maps OAuth `state` nonces to the user record that initiated
/// the connect flow; entries live only until the callback consumes them.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub pending: Arc<Mutex<HashMap<String, String>>>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        AppState {
            pipeline,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/spotify/auth", get(api::authorize))
        .route("/spotify/callback", get(api::callback))
        .route("/recommendations", post(api::recommend))
        .route("/playlists", post(api::create_playlist))
        .route("/search", get(api::search))
        .route("/top-tracks", get(api::top_tracks))
        .layer(Extension(state))
}

pub async fn start_api_server(state: AppState) {
    let app = router(state);

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
