use std::collections::HashSet;

use crate::{info, spotify::SpotifyApi, types::TrackObject, utils, warning};

/// Number of search results requested per candidate; only the first is
/// ever accepted.
const SEARCH_LIMIT: u32 = 3;

/// Outcome of looking up one candidate line.
///
/// Deliberately has no error variant: every way a lookup can go wrong -
/// timeout, auth, rate limit, empty result, duplicate id - collapses into
/// `Miss`, so the skip-and-continue policy is enforced by the signature
/// instead of by catch blocks inside the loop. Fatal errors only exist
/// outside the resolution loop.
pub enum Lookup {
    Hit(TrackObject),
    Miss,
}

/// Resolves candidate lines into verified catalog tracks.
///
/// Candidates are processed strictly in order and searches are issued
/// sequentially; the loop stops as soon as `target_count` tracks are
/// resolved, so trailing candidates cost no calls. Lines that clean down
/// to fewer than 3 characters are skipped without a search. The result
/// preserves candidate order, never exceeds `target_count`, and never
/// contains two tracks with the same catalog id.
pub async fn resolve_candidates(
    api: &SpotifyApi,
    token: &str,
    candidates: &[String],
    target_count: usize,
) -> Vec<TrackObject> {
    let mut resolved: Vec<TrackObject> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    info!(
        "Resolving {} candidates, target: {}",
        candidates.len(),
        target_count
    );

    for candidate in candidates {
        if resolved.len() >= target_count {
            break;
        }

        let Some(query) = utils::clean_candidate_line(candidate) else {
            continue;
        };

        match lookup_candidate(api, token, &query, &mut seen_ids).await {
            Lookup::Hit(track) => {
                info!("Found: {} by {}", track.name, track.artist_names());
                resolved.push(track);
            }
            Lookup::Miss => {}
        }
    }

    info!("Resolved {}/{} tracks", resolved.len(), target_count);
    resolved
}

/// Searches the catalog for one cleaned candidate and classifies the result.
///
/// The first search hit wins; a hit whose catalog id was already accepted
/// counts as a miss, keeping the result free of duplicates when the model
/// suggests the same song twice.
async fn lookup_candidate(
    api: &SpotifyApi,
    token: &str,
    query: &str,
    seen_ids: &mut HashSet<String>,
) -> Lookup {
    match api.search_tracks(token, query, SEARCH_LIMIT).await {
        Ok(results) => match results.into_iter().next() {
            Some(track) => {
                if seen_ids.insert(track.id.clone()) {
                    Lookup::Hit(track)
                } else {
                    info!("Skipping duplicate match for '{}': {}", query, track.name);
                    Lookup::Miss
                }
            }
            None => {
                info!("No match found for: {}", query);
                Lookup::Miss
            }
        },
        Err(e) => {
            warning!("Search failed for '{}': {}", query, e);
            Lookup::Miss
        }
    }
}
