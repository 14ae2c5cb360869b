use chrono::{Duration, Utc};

use tunesmith::error::StoreError;
use tunesmith::management::{FileUserStore, UserStore};
use tunesmith::types::{TokenState, UserRecord};

fn test_user(id: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        display_name: Some("Test Listener".to_string()),
        spotify: None,
    }
}

fn test_tokens() -> TokenState {
    TokenState {
        access_token: "access-1".to_string(),
        refresh_token: "refresh-1".to_string(),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

#[tokio::test]
async fn put_and_get_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileUserStore::new(dir.path().to_path_buf());

    let mut user = test_user("user-1");
    user.spotify = Some(test_tokens());
    store.put(&user).await.unwrap();

    let loaded = store.get("user-1").await.unwrap().unwrap();
    assert_eq!(loaded.id, "user-1");
    assert_eq!(loaded.email, "user-1@example.com");
    assert_eq!(loaded.display_name.as_deref(), Some("Test Listener"));

    let tokens = loaded.spotify.unwrap();
    assert_eq!(tokens.access_token, "access-1");
    assert_eq!(tokens.refresh_token, "refresh-1");
}

#[tokio::test]
async fn get_missing_user_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileUserStore::new(dir.path().to_path_buf());

    let loaded = store.get("nobody").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn update_tokens_overwrites_token_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileUserStore::new(dir.path().to_path_buf());

    let mut user = test_user("user-1");
    user.spotify = Some(test_tokens());
    store.put(&user).await.unwrap();

    let refreshed = TokenState {
        access_token: "access-2".to_string(),
        refresh_token: "refresh-2".to_string(),
        expires_at: Utc::now() + Duration::hours(2),
    };
    store.update_tokens("user-1", &refreshed).await.unwrap();

    let loaded = store.get("user-1").await.unwrap().unwrap();
    let tokens = loaded.spotify.unwrap();
    assert_eq!(tokens.access_token, "access-2");
    assert_eq!(tokens.refresh_token, "refresh-2");

    // Other record fields are untouched by a token update
    assert_eq!(loaded.email, "user-1@example.com");
}

#[tokio::test]
async fn update_tokens_for_unknown_user_errors() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileUserStore::new(dir.path().to_path_buf());

    let result = store.update_tokens("ghost", &test_tokens()).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn user_ids_map_to_flat_filenames() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileUserStore::new(dir.path().to_path_buf());

    // A path-ish id must not escape the store root
    let user = test_user("../outside/alice");
    store.put(&user).await.unwrap();

    let loaded = store.get("../outside/alice").await.unwrap().unwrap();
    assert_eq!(loaded.id, "../outside/alice");
    assert!(!dir.path().parent().unwrap().join("outside").exists());
}
