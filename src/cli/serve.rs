use std::sync::Arc;

use crate::{
    config, info,
    management::{FileUserStore, UserStore},
    pipeline::Pipeline,
    server::{AppState, start_api_server},
};

/// Runs the HTTP API server until terminated.
pub async fn serve() {
    let store: Arc<dyn UserStore> = Arc::new(FileUserStore::open_default());
    let pipeline = Arc::new(Pipeline::from_env(store));
    let state = AppState::new(pipeline);

    info!(
        "Starting recommendation server on {}",
        config::server_addr()
    );
    start_api_server(state).await;
}
