use crate::{
    error::PipelineError,
    groq::GroqClient,
    types::{ChatMessage, RecommendationContext},
    utils,
};

/// Raw model output plus the candidate lines split out of it.
///
/// The raw text is kept so callers can echo the model's answer back to the
/// client; the lines are what the resolver consumes.
pub struct Suggestions {
    pub raw: String,
    pub lines: Vec<String>,
}

/// Asks the language model for candidate songs.
///
/// Requests `ceil(target_count * 1.5)` lines so that catalog misses during
/// resolution still leave enough verified tracks to reach the target. The
/// system instruction pins the format: exactly that many lines, each
/// `"Song Name by Artist Name"`, no numbering or commentary, and no
/// invented songs. The model's honesty is not trusted - verification
/// against the catalog is the resolver's job.
///
/// # Errors
///
/// A non-2xx completion response surfaces as `SuggestionFailed`; the
/// pipeline turns that into a fallback outcome rather than an error.
pub async fn suggest_candidates(
    groq: &GroqClient,
    ctx: &RecommendationContext,
    target_count: usize,
) -> Result<Suggestions, PipelineError> {
    let count = utils::request_count(target_count);

    let mut messages = vec![ChatMessage::system(system_prompt(count))];
    messages.extend(ctx.history.iter().cloned());
    messages.push(ChatMessage::user(user_prompt(ctx)));

    let raw = groq.chat(messages, 0.8, 1000).await?;

    let lines: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    Ok(Suggestions { raw, lines })
}

fn system_prompt(count: usize) -> String {
    format!(
        "You are a music recommendation expert. Suggest EXACTLY {count} songs with their \
         artists that match the listener's request. IMPORTANT: Only suggest real, existing \
         songs that can be found on Spotify. Do NOT make up song names. Format each song as \
         \"Song Name by Artist Name\" on separate lines. Only provide the {count} song \
         titles, nothing else - no numbering, no explanations, no extra text."
    )
}

fn user_prompt(ctx: &RecommendationContext) -> String {
    let mut parts = Vec::new();

    if !ctx.current_playlist.is_empty() {
        parts.push(format!(
            "Current playlist:\n{}",
            utils::format_track_list(&ctx.current_playlist)
        ));
    } else if !ctx.taste_profile.is_empty() {
        parts.push(format!(
            "Listener favourites:\n{}",
            utils::format_track_list(&ctx.taste_profile)
        ));
    }

    parts.push(format!("Request: {}", ctx.prompt));
    parts.join("\n\n")
}
