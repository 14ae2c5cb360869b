//! End-to-end pipeline tests against stub upstream servers.
//!
//! Each test starts a local axum app standing in for the Spotify API, the
//! accounts service, and the Groq endpoint, all behind one OS-assigned
//! port. The pipeline under test is pointed at that base URL, so token
//! refresh counting, search sequencing, and batch sizes are observed on
//! the wire rather than inferred.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    Extension, Router,
    extract::Query,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use tunesmith::{
    error::{PipelineError, StoreError},
    groq::GroqClient,
    management::{FileUserStore, UserStore},
    pipeline::{Pipeline, RecommendationOutcome},
    server::AppState,
    spotify::{SpotifyApi, SpotifyAuth},
    types::{RecommendationContext, TokenState, UserRecord},
};

#[derive(Clone, Default)]
struct Counters {
    token_calls: Arc<Mutex<usize>>,
    search_queries: Arc<Mutex<Vec<String>>>,
    add_batches: Arc<Mutex<Vec<usize>>>,
}

#[derive(Clone)]
struct Stub {
    chat_content: String,
    chat_fails: bool,
    // cleaned query -> (track id, track name, artist name)
    catalog: HashMap<String, (String, String, String)>,
    failing_queries: HashSet<String>,
    // 1-based add-tracks call numbers that answer 500
    failing_batches: HashSet<usize>,
    counters: Counters,
}

fn make_stub(chat_content: &str) -> Stub {
    Stub {
        chat_content: chat_content.to_string(),
        chat_fails: false,
        catalog: HashMap::new(),
        failing_queries: HashSet::new(),
        failing_batches: HashSet::new(),
        counters: Counters::default(),
    }
}

async fn token_handler(Extension(stub): Extension<Stub>) -> Json<Value> {
    *stub.counters.token_calls.lock().await += 1;
    Json(json!({
        "access_token": "fresh-token",
        "refresh_token": "rotated-refresh",
        "expires_in": 3600,
        "scope": "test",
    }))
}

async fn search_handler(
    Query(params): Query<HashMap<String, String>>,
    Extension(stub): Extension<Stub>,
) -> (StatusCode, Json<Value>) {
    let q = params.get("q").cloned().unwrap_or_default();
    stub.counters.search_queries.lock().await.push(q.clone());

    if stub.failing_queries.contains(&q) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "search exploded" })),
        );
    }

    let items = match stub.catalog.get(&q) {
        Some((id, name, artist)) => json!([{
            "id": id,
            "name": name,
            "artists": [{ "name": artist }],
            "uri": format!("spotify:track:{id}"),
        }]),
        None => json!([]),
    };

    (StatusCode::OK, Json(json!({ "tracks": { "items": items } })))
}

async fn me_handler() -> Json<Value> {
    Json(json!({ "id": "stub-profile" }))
}

async fn top_tracks_handler() -> Json<Value> {
    Json(json!({ "items": [] }))
}

async fn create_playlist_handler(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "id": "playlist-1",
        "name": body.get("name").cloned().unwrap_or_else(|| json!("")),
    }))
}

async fn add_tracks_handler(
    Extension(stub): Extension<Stub>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let count = body
        .get("uris")
        .and_then(|u| u.as_array())
        .map(|a| a.len())
        .unwrap_or(0);

    let call_number = {
        let mut batches = stub.counters.add_batches.lock().await;
        batches.push(count);
        batches.len()
    };

    if stub.failing_batches.contains(&call_number) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "batch exploded" })),
        );
    }

    (StatusCode::OK, Json(json!({ "snapshot_id": "snap" })))
}

async fn chat_handler(
    Extension(stub): Extension<Stub>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if stub.chat_fails {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "model overloaded" })),
        );
    }

    // The explanation call identifies itself through its system prompt;
    // everything else gets the configured suggestion lines.
    let is_explanation = body
        .get("messages")
        .and_then(|m| m.as_array())
        .is_some_and(|msgs| {
            msgs.iter().any(|m| {
                m.get("content")
                    .and_then(|c| c.as_str())
                    .is_some_and(|c| c.contains("music curator"))
            })
        });

    let content = if is_explanation {
        "Because these songs fit the brief.".to_string()
    } else {
        stub.chat_content.clone()
    };

    (
        StatusCode::OK,
        Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }],
        })),
    )
}

async fn start_stub(stub: Stub) -> String {
    let app = Router::new()
        .route("/api/token", post(token_handler))
        .route("/search", get(search_handler))
        .route("/me", get(me_handler))
        .route("/me/top/tracks", get(top_tracks_handler))
        .route("/users/{user_id}/playlists", post(create_playlist_handler))
        .route("/playlists/{playlist_id}/tracks", post(add_tracks_handler))
        .route("/chat", post(chat_handler))
        .layer(Extension(stub));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn test_pipeline(base: &str, store: Arc<dyn UserStore>) -> Pipeline {
    Pipeline {
        spotify: SpotifyApi::new(base.to_string()),
        auth: SpotifyAuth {
            http: reqwest::Client::new(),
            auth_url: format!("{base}/authorize"),
            token_url: format!("{base}/api/token"),
            redirect_uri: "http://127.0.0.1/callback".to_string(),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            scope: "scope".to_string(),
        },
        groq: GroqClient::new(format!("{base}/chat"), "key".to_string(), "model".to_string()),
        store,
    }
}

fn connected_user(expired: bool) -> UserRecord {
    let expires_at = if expired {
        Utc::now() - Duration::hours(1)
    } else {
        Utc::now() + Duration::hours(1)
    };

    UserRecord {
        id: "user-1".to_string(),
        email: "listener@example.com".to_string(),
        display_name: None,
        spotify: Some(TokenState {
            access_token: "cached-token".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_at,
        }),
    }
}

async fn store_with(dir: &tempfile::TempDir, user: UserRecord) -> Arc<dyn UserStore> {
    let store: Arc<dyn UserStore> = Arc::new(FileUserStore::new(dir.path().to_path_buf()));
    store.put(&user).await.unwrap();
    store
}

fn ctx(prompt: &str) -> RecommendationContext {
    RecommendationContext {
        prompt: prompt.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn expired_token_triggers_exactly_one_refresh() {
    let mut stub = make_stub("Harvest Moon by Neil Young");
    stub.catalog.insert(
        "Harvest Moon by Neil Young".to_string(),
        (
            "id-hm".to_string(),
            "Harvest Moon".to_string(),
            "Neil Young".to_string(),
        ),
    );
    let counters = stub.counters.clone();

    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&dir, connected_user(true)).await;
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, Arc::clone(&store));

    let outcome = pipeline
        .generate_recommendations("user-1", ctx("mellow folk"), 1)
        .await
        .unwrap();

    assert_eq!(*counters.token_calls.lock().await, 1);

    // The refreshed state landed on the persisted record
    let user = store.get("user-1").await.unwrap().unwrap();
    let tokens = user.spotify.unwrap();
    assert_eq!(tokens.access_token, "fresh-token");
    assert_eq!(tokens.refresh_token, "rotated-refresh");
    assert!(tokens.expires_at > Utc::now());

    match outcome {
        RecommendationOutcome::Ready(response) => {
            assert_eq!(response.tracks.len(), 1);
            assert_eq!(response.tracks[0].id, "id-hm");
            assert_eq!(response.explanation, "Because these songs fit the brief.");
        }
        RecommendationOutcome::Fallback(_) => panic!("expected a ready outcome"),
    }
}

#[tokio::test]
async fn fresh_token_performs_no_exchange_calls() {
    let mut stub = make_stub("Harvest Moon by Neil Young");
    stub.catalog.insert(
        "Harvest Moon by Neil Young".to_string(),
        (
            "id-hm".to_string(),
            "Harvest Moon".to_string(),
            "Neil Young".to_string(),
        ),
    );
    let counters = stub.counters.clone();

    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&dir, connected_user(false)).await;
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, store);

    pipeline
        .generate_recommendations("user-1", ctx("mellow folk"), 1)
        .await
        .unwrap();

    assert_eq!(*counters.token_calls.lock().await, 0);
}

#[tokio::test]
async fn resolver_continues_after_a_failed_search() {
    let lines = "Song A by Alpha\nSong B by Beta\nSong C by Gamma";
    let mut stub = make_stub(lines);
    for (key, id, name, artist) in [
        ("Song A by Alpha", "id-a", "Song A", "Alpha"),
        ("Song C by Gamma", "id-c", "Song C", "Gamma"),
    ] {
        stub.catalog.insert(
            key.to_string(),
            (id.to_string(), name.to_string(), artist.to_string()),
        );
    }
    stub.failing_queries.insert("Song B by Beta".to_string());
    let counters = stub.counters.clone();

    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&dir, connected_user(false)).await;
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, store);

    let outcome = pipeline
        .generate_recommendations("user-1", ctx("anything"), 3)
        .await
        .unwrap();

    // All three candidates were searched despite the failure in the middle
    assert_eq!(counters.search_queries.lock().await.len(), 3);

    match outcome {
        RecommendationOutcome::Ready(response) => {
            let ids: Vec<&str> = response.tracks.iter().map(|t| t.id.as_str()).collect();
            assert_eq!(ids, vec!["id-a", "id-c"]);
        }
        RecommendationOutcome::Fallback(_) => panic!("expected a ready outcome"),
    }
}

#[tokio::test]
async fn resolver_stops_at_target_and_preserves_order() {
    // 18 candidates, of which 3 are not in the catalog: the spec scenario
    // where 15 resolve and the first 12 in generation order are returned.
    let misses: HashSet<usize> = [2, 7, 11].into_iter().collect();
    let lines: Vec<String> = (1..=18).map(|i| format!("Track {i:02} by Band")).collect();

    let mut stub = make_stub(&lines.join("\n"));
    for (i, line) in lines.iter().enumerate() {
        let n = i + 1;
        if misses.contains(&n) {
            continue;
        }
        stub.catalog.insert(
            line.clone(),
            (
                format!("id-{n:02}"),
                format!("Track {n:02}"),
                "Band".to_string(),
            ),
        );
    }
    let counters = stub.counters.clone();

    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&dir, connected_user(false)).await;
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, store);

    let outcome = pipeline
        .generate_recommendations("user-1", ctx("indie rock"), 12)
        .await
        .unwrap();

    match outcome {
        RecommendationOutcome::Ready(response) => {
            assert_eq!(response.tracks.len(), 12);

            // Generation order, skipping the misses, cut off at the target
            let expected: Vec<String> = (1..=15)
                .filter(|n| !misses.contains(n))
                .map(|n| format!("id-{n:02}"))
                .collect();
            let ids: Vec<&str> = response.tracks.iter().map(|t| t.id.as_str()).collect();
            assert_eq!(ids, expected);
        }
        RecommendationOutcome::Fallback(_) => panic!("expected a ready outcome"),
    }

    // The 12th hit lands on candidate 15; candidates 16-18 cost no calls
    assert_eq!(counters.search_queries.lock().await.len(), 15);
}

#[tokio::test]
async fn duplicate_catalog_ids_resolve_once() {
    let lines = "Fast Car by Tracy Chapman\nFast Car (Live) by Tracy Chapman";
    let mut stub = make_stub(lines);
    // Both candidates resolve to the same catalog entry
    for key in ["Fast Car by Tracy Chapman", "Fast Car (Live) by Tracy Chapman"] {
        stub.catalog.insert(
            key.to_string(),
            (
                "id-fc".to_string(),
                "Fast Car".to_string(),
                "Tracy Chapman".to_string(),
            ),
        );
    }

    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&dir, connected_user(false)).await;
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, store);

    let outcome = pipeline
        .generate_recommendations("user-1", ctx("car songs"), 2)
        .await
        .unwrap();

    match outcome {
        RecommendationOutcome::Ready(response) => {
            assert_eq!(response.tracks.len(), 1);
            assert_eq!(response.tracks[0].id, "id-fc");
        }
        RecommendationOutcome::Fallback(_) => panic!("expected a ready outcome"),
    }
}

#[tokio::test]
async fn zero_resolved_candidates_fall_back() {
    // Suggestions arrive but nothing is in the catalog
    let stub = make_stub("Imaginary Song by Nobody\nAnother Fake by NoOne");

    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&dir, connected_user(false)).await;
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, store);

    let outcome = pipeline
        .generate_recommendations("user-1", ctx("anything"), 5)
        .await
        .unwrap();

    assert!(outcome.is_fallback());
    let body = outcome.into_json();
    assert_eq!(body["fallback"], json!(true));
    assert_eq!(body["tracks"], json!([]));
    assert_eq!(body["items"], json!([]));
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn failed_suggestion_call_falls_back() {
    let mut stub = make_stub("");
    stub.chat_fails = true;

    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&dir, connected_user(false)).await;
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, store);

    let outcome = pipeline
        .generate_recommendations("user-1", ctx("anything"), 5)
        .await
        .unwrap();

    assert!(outcome.is_fallback());
    let body = outcome.into_json();
    assert_eq!(body["fallback"], json!(true));
    assert_eq!(body["tracks"], json!([]));
}

#[tokio::test]
async fn missing_connection_is_a_hard_error() {
    let stub = make_stub("");
    let dir = tempfile::tempdir().unwrap();
    let store = store_with(
        &dir,
        UserRecord {
            id: "user-1".to_string(),
            email: "listener@example.com".to_string(),
            display_name: None,
            spotify: None,
        },
    )
    .await;
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, store);

    let result = pipeline
        .generate_recommendations("user-1", ctx("anything"), 5)
        .await;
    assert!(matches!(result, Err(PipelineError::NotConnected)));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let stub = make_stub("");
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn UserStore> = Arc::new(FileUserStore::new(dir.path().to_path_buf()));
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, store);

    let result = pipeline
        .generate_recommendations("ghost", ctx("anything"), 5)
        .await;
    assert!(matches!(
        result,
        Err(PipelineError::Store(StoreError::NotFound(_)))
    ));
}

#[tokio::test]
async fn playlist_tracks_are_added_in_batches_of_100() {
    let stub = make_stub("");
    let counters = stub.counters.clone();

    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&dir, connected_user(false)).await;
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, store);

    let uris: Vec<String> = (0..250).map(|i| format!("spotify:track:{i}")).collect();
    let report = pipeline
        .create_playlist("user-1", Some("Big Mix".to_string()), None, uris)
        .await
        .unwrap();

    assert_eq!(report.playlist_id, "playlist-1");
    assert_eq!(report.requested, 250);
    assert_eq!(report.added, 250);
    assert_eq!(*counters.add_batches.lock().await, vec![100, 100, 50]);
}

#[tokio::test]
async fn playlist_add_continues_after_failed_batch() {
    let mut stub = make_stub("");
    stub.failing_batches.insert(2);
    let counters = stub.counters.clone();

    let dir = tempfile::tempdir().unwrap();
    let store = store_with(&dir, connected_user(false)).await;
    let base = start_stub(stub).await;
    let pipeline = test_pipeline(&base, store);

    let uris: Vec<String> = (0..250).map(|i| format!("spotify:track:{i}")).collect();
    let report = pipeline
        .create_playlist("user-1", None, None, uris)
        .await
        .unwrap();

    // All three batches were attempted; only the failed one is missing
    assert_eq!(*counters.add_batches.lock().await, vec![100, 100, 50]);
    assert_eq!(report.added, 150);
}

#[tokio::test]
async fn recommend_route_answers_401_when_not_connected() {
    let stub = make_stub("");
    let dir = tempfile::tempdir().unwrap();
    let store = store_with(
        &dir,
        UserRecord {
            id: "user-1".to_string(),
            email: "listener@example.com".to_string(),
            display_name: None,
            spotify: None,
        },
    )
    .await;
    let base = start_stub(stub).await;
    let pipeline = Arc::new(test_pipeline(&base, store));
    let state = AppState::new(pipeline);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, tunesmith::server::router(state))
            .await
            .unwrap();
    });

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/recommendations"))
        .json(&json!({ "user_id": "user-1", "prompt": "lofi beats" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["needs_reconnect"], json!(true));
}
