use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error, info,
    management::{FileUserStore, UserStore},
    pipeline::{Pipeline, RecommendationOutcome},
    success,
    types::{RecommendationContext, TrackTableRow},
    warning,
};

/// Runs the recommendation pipeline for a stored user and prints the
/// result as a table. With `--save NAME` the verified tracks are also
/// materialized as a playlist on the user's account.
pub async fn recommend(user_id: String, prompt: String, count: usize, save: Option<String>) {
    let store: Arc<dyn UserStore> = Arc::new(FileUserStore::open_default());
    let pipeline = Pipeline::from_env(store);

    let pb = ProgressBar::new_spinner();
    pb.set_message("Generating recommendations...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let ctx = RecommendationContext {
        prompt,
        ..Default::default()
    };

    let outcome = match pipeline
        .generate_recommendations(&user_id, ctx, count)
        .await
    {
        Ok(outcome) => {
            pb.finish_and_clear();
            outcome
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("Recommendation failed: {}", e);
        }
    };

    match outcome {
        RecommendationOutcome::Ready(response) => {
            let rows: Vec<TrackTableRow> = response
                .tracks
                .iter()
                .map(|t| TrackTableRow {
                    title: t.name.clone(),
                    artists: t.artist_names(),
                })
                .collect();

            println!("{}", Table::new(rows));
            info!("{}", response.explanation);

            if let Some(name) = save {
                let uris: Vec<String> = response.tracks.iter().map(|t| t.uri.clone()).collect();
                match pipeline
                    .create_playlist(
                        &user_id,
                        Some(name),
                        Some(response.explanation.clone()),
                        uris,
                    )
                    .await
                {
                    Ok(report) => success!(
                        "Playlist {} created with {}/{} tracks",
                        report.playlist_id,
                        report.added,
                        report.requested
                    ),
                    Err(e) => error!("Failed to create playlist: {}", e),
                }
            }
        }
        RecommendationOutcome::Fallback(body) => {
            warning!(
                "{}",
                body.get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("Recommendations unavailable.")
            );
        }
    }
}
