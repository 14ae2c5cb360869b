use rand::{Rng, distr::Alphanumeric};

use crate::types::TrackObject;

/// Maximum playlist description length accepted by the Spotify API.
pub const MAX_DESCRIPTION_LEN: usize = 300;

pub fn generate_state_nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Number of candidate lines to request from the suggestion model for a
/// given target track count. Requests 50% more than the target to compensate
/// for suggestions that cannot be found in the catalog.
pub fn request_count(target: usize) -> usize {
    target + target.div_ceil(2)
}

/// Normalizes one AI-suggested candidate line.
///
/// Strips leading numbering ("12. " / "3) ") and bullet markers ("- " / "* ")
/// and surrounding whitespace. Returns `None` for lines that are blank or
/// shorter than 3 characters after cleaning; those are skipped by the
/// resolver rather than searched.
pub fn clean_candidate_line(line: &str) -> Option<String> {
    let mut s = line.trim();

    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &s[digits..];
        if let Some(r) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            s = r.trim_start();
        }
    }

    if let Some(r) = s.strip_prefix('-').or_else(|| s.strip_prefix('*')) {
        s = r.trim_start();
    }

    let s = s.trim();
    if s.chars().count() < 3 {
        None
    } else {
        Some(s.to_string())
    }
}

/// Truncates a playlist description to the provider's 300-character limit.
///
/// Descriptions longer than the limit keep their first 297 characters and
/// get a trailing `"..."`, so the stored value is exactly 300 characters.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_LEN {
        return description.to_string();
    }

    let mut truncated: String = description.chars().take(MAX_DESCRIPTION_LEN - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Formats tracks as `"Title by Artist, Artist"` lines for prompts.
pub fn format_track_list(tracks: &[TrackObject]) -> String {
    tracks
        .iter()
        .map(|t| format!("{} by {}", t.name, t.artist_names()))
        .collect::<Vec<_>>()
        .join("\n")
}
