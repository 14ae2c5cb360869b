use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    error, info,
    management::{FileUserStore, UserStore},
    pipeline::Pipeline,
    server::{AppState, start_api_server},
    success,
    types::UserRecord,
    utils, warning,
};

/// Connects a user's Spotify account from the terminal.
///
/// Ensures a user record exists, starts the API server so the OAuth
/// callback has somewhere to land, opens the authorization URL in the
/// default browser, and polls the store until the tokens show up or the
/// wait times out.
pub async fn connect(user_id: String, email: Option<String>) {
    let store: Arc<dyn UserStore> = Arc::new(FileUserStore::open_default());

    match store.get(&user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let record = UserRecord {
                id: user_id.clone(),
                email: email.unwrap_or_default(),
                display_name: None,
                spotify: None,
            };
            if let Err(e) = store.put(&record).await {
                error!("Failed to create user record: {}", e);
            }
            info!("Created user record {}", user_id);
        }
        Err(e) => {
            error!("Failed to open user store: {}", e);
        }
    }

    let pipeline = Arc::new(Pipeline::from_env(Arc::clone(&store)));
    let state = AppState::new(pipeline);

    // run the callback server alongside the wait loop
    let server_state = state.clone();
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    let nonce = utils::generate_state_nonce();
    state
        .pending
        .lock()
        .await
        .insert(nonce.clone(), user_id.clone());
    let auth_url = state.pipeline.auth.authorize_url(&nonce);

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    if wait_for_connection(store.as_ref(), &user_id).await {
        success!("Spotify account connected for {}", user_id);
    } else {
        error!("Connection failed or timed out.");
    }
}

/// Polls the store until the user record carries token state.
///
/// - Maximum wait time: 120 seconds
/// - Polling interval: 1 second
async fn wait_for_connection(store: &dyn UserStore, user_id: &str) -> bool {
    let max_wait = Duration::from_secs(120);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        if let Ok(Some(user)) = store.get(user_id).await {
            if user.spotify.is_some() {
                return true;
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    false
}
