//! # Recommendation Pipeline Module
//!
//! The token-gated orchestration pipeline behind the recommendation feature.
//! One run of the pipeline services one inbound request and walks a fixed
//! state machine:
//!
//! ```text
//! START → TOKEN_VALID → SUGGESTING → RESOLVING
//!     → TARGET_MET → MATERIALIZE → DONE
//!     → ZERO_RESOLVED → FALLBACK → DONE
//! ```
//!
//! ## Stages
//!
//! 1. **Token** - [`crate::management::TokenManager`] returns a valid access
//!    token, refreshing through the token-exchange endpoint when the stored
//!    expiry has passed. Refresh failure aborts the run.
//! 2. **Suggest** - [`suggest`] asks the language model for candidate
//!    `"Title by Artist"` lines, over-requesting by 50% to compensate for
//!    catalog misses. A failed suggestion call makes the whole run fall
//!    back instead of erroring.
//! 3. **Resolve** - [`resolver`] verifies candidates against the catalog
//!    one at a time, sequentially, stopping as soon as the target count is
//!    reached. Per-candidate failures are absorbed as misses.
//! 4. **Materialize or fall back** - resolved tracks are returned with an
//!    explanation, and can be turned into a real playlist by
//!    [`materialize`]; zero resolved tracks produce the stable fallback
//!    shape from [`fallback`] instead of an error.
//!
//! ## Concurrency model
//!
//! Everything in a run happens inside the calling request's future. Catalog
//! searches are issued sequentially by design: early termination only saves
//! calls when the loop is sequential, and a sequential loop cannot burst
//! past the upstream rate limit. Every network call carries its own
//! timeout, and every `.await` doubles as a cancellation point - when the
//! client disconnects and the handler future is dropped, in-flight work
//! stops with it. Nothing is spawned onto detached tasks and no state
//! outlives the run except the token cache on the user record.

pub mod fallback;
pub mod materialize;
pub mod resolver;
pub mod suggest;

use std::sync::Arc;

use serde_json::{Value, json};

use crate::{
    error::{PipelineError, StoreError},
    groq::GroqClient,
    management::{TokenManager, UserStore},
    pipeline::fallback::fallback_response,
    spotify::{SpotifyApi, SpotifyAuth},
    types::{RecommendationContext, RecommendationResponse},
    utils, warning,
};

pub use materialize::MaterializeReport;

const DEFAULT_EXPLANATION: &str = "These tracks are curated to match your request.";

/// Number of top tracks fetched to build the taste profile.
const TASTE_PROFILE_SIZE: u32 = 5;

/// The assembled pipeline: upstream clients plus the user store.
pub struct Pipeline {
    pub spotify: SpotifyApi,
    pub auth: SpotifyAuth,
    pub groq: GroqClient,
    pub store: Arc<dyn UserStore>,
}

/// Outcome of a recommendation run: either a verified track list with an
/// explanation, or the stable fallback shape.
pub enum RecommendationOutcome {
    Ready(RecommendationResponse),
    Fallback(Value),
}

impl RecommendationOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RecommendationOutcome::Fallback(_))
    }

    pub fn into_json(self) -> Value {
        match self {
            RecommendationOutcome::Ready(response) => {
                json!({
                    "tracks": response.tracks,
                    "explanation": response.explanation,
                    "ai_response": response.ai_response,
                    "fallback": false,
                })
            }
            RecommendationOutcome::Fallback(body) => body,
        }
    }
}

impl Pipeline {
    pub fn from_env(store: Arc<dyn UserStore>) -> Self {
        Pipeline {
            spotify: SpotifyApi::from_env(),
            auth: SpotifyAuth::from_env(),
            groq: GroqClient::from_env(),
            store,
        }
    }

    /// Entry point consumed by the route layer and the CLI.
    ///
    /// Produces `target_count` verified tracks for the listener's request,
    /// or the fallback shape when suggestion or resolution comes up empty.
    ///
    /// # Errors
    ///
    /// Only systemic conditions escape as errors: an unknown user, a
    /// missing connection, a failed token refresh, or a store failure.
    /// Upstream flakiness during suggestion or resolution is converted
    /// into the fallback outcome instead.
    pub async fn generate_recommendations(
        &self,
        user_id: &str,
        mut ctx: RecommendationContext,
        target_count: usize,
    ) -> Result<RecommendationOutcome, PipelineError> {
        let mut user = self
            .store
            .get(user_id)
            .await?
            .ok_or_else(|| PipelineError::Store(StoreError::NotFound(user_id.to_string())))?;

        let token = TokenManager::new(&self.auth, self.store.as_ref())
            .get_valid_token(&mut user)
            .await?;

        // No current playlist to anchor the prompt: use the listener's top
        // tracks as a taste profile. Absorbed on failure.
        if ctx.current_playlist.is_empty() {
            match self.spotify.top_tracks(&token, TASTE_PROFILE_SIZE).await {
                Ok(tracks) => ctx.taste_profile = tracks,
                Err(e) => warning!("Failed to load top tracks for taste profile: {}", e),
            }
        }

        let suggestions = match suggest::suggest_candidates(&self.groq, &ctx, target_count).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warning!("Suggestion request failed: {}", e);
                return Ok(RecommendationOutcome::Fallback(fallback_response(
                    "Unable to generate music recommendations at the moment.",
                    json!({
                        "explanation": "Music recommendations temporarily unavailable.",
                        "ai_response": "",
                    }),
                )));
            }
        };

        let tracks =
            resolver::resolve_candidates(&self.spotify, &token, &suggestions.lines, target_count)
                .await;

        if tracks.is_empty() {
            return Ok(RecommendationOutcome::Fallback(fallback_response(
                "No suggested tracks could be verified in the catalog.",
                json!({
                    "explanation": "Music recommendations temporarily unavailable.",
                    "ai_response": suggestions.raw,
                }),
            )));
        }

        let explanation = self.explain(&ctx, &tracks).await;

        Ok(RecommendationOutcome::Ready(RecommendationResponse {
            tracks,
            explanation,
            ai_response: suggestions.raw,
        }))
    }

    /// Resolves a valid access token for the user without running the rest
    /// of the pipeline. Used by the thin pass-through routes.
    pub async fn access_token_for(&self, user_id: &str) -> Result<String, PipelineError> {
        let mut user = self
            .store
            .get(user_id)
            .await?
            .ok_or_else(|| PipelineError::Store(StoreError::NotFound(user_id.to_string())))?;

        TokenManager::new(&self.auth, self.store.as_ref())
            .get_valid_token(&mut user)
            .await
    }

    /// Creates a playlist on the listener's account from an ordered URI
    /// list. See [`materialize::materialize`] for the batching behavior.
    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: Option<String>,
        description: Option<String>,
        uris: Vec<String>,
    ) -> Result<MaterializeReport, PipelineError> {
        let token = self.access_token_for(user_id).await?;
        let name = name.unwrap_or_else(|| "AI Recommended Playlist".to_string());
        let description =
            description.unwrap_or_else(|| "Created by your AI music assistant".to_string());

        materialize::materialize(&self.spotify, &token, &name, &description, &uris).await
    }

    async fn explain(
        &self,
        ctx: &RecommendationContext,
        tracks: &[crate::types::TrackObject],
    ) -> String {
        let messages = vec![
            crate::types::ChatMessage::system(
                "You are a music curator. Briefly explain in 2-3 sentences why the selected \
                 tracks fit the listener's request.",
            ),
            crate::types::ChatMessage::user(format!(
                "Request: {}\n\nSelected tracks:\n{}\n\nExplain the selection.",
                ctx.prompt,
                utils::format_track_list(tracks),
            )),
        ];

        match self.groq.chat(messages, 0.7, 200).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => DEFAULT_EXPLANATION.to_string(),
            Err(e) => {
                warning!("Explanation request failed: {}", e);
                DEFAULT_EXPLANATION.to_string()
            }
        }
    }
}
