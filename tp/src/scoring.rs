//! POI scoring
//!
//! Assigns each catalog POI a desirability score from popularity, the
//! preference lists, and group suitability. Pure: same pool and
//! preferences always produce the same scores and ordering (catalog order
//! breaks ties).

use tracing::debug;

use crate::domain::{CandidatePoi, Group, Preferences, ScoredPoi};

/// Score bonus for a must-visit name match
const MUST_VISIT_BONUS: f64 = 0.10;

/// Score bonus for a tag in the preferred attraction types
const PREFERRED_TYPE_BONUS: f64 = 0.05;

/// Score the catalog against the group and preferences
///
/// POIs unsuitable for the group are excluded before scoring; avoided POIs
/// score zero and are dropped. The result is sorted by descending score.
pub fn score_pool(catalog: &[CandidatePoi], group: &Group, preferences: &Preferences) -> Vec<ScoredPoi> {
    let mut pool: Vec<ScoredPoi> = catalog
        .iter()
        .filter(|poi| suitable_for_group(poi, group))
        .filter_map(|poi| {
            let score = score_poi(poi, preferences);
            if score <= 0.0 {
                debug!(name = %poi.name, "excluded by avoid list or zero score");
                return None;
            }
            Some(ScoredPoi::new(poi.clone(), score))
        })
        .collect();

    // Stable sort keeps catalog order as the tie-break
    pool.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    debug!(candidates = pool.len(), "scored POI pool");
    pool
}

/// Score one POI against the preferences
fn score_poi(poi: &CandidatePoi, preferences: &Preferences) -> f64 {
    if matches_avoid(poi, &preferences.avoid) {
        return 0.0;
    }

    let mut score = poi.popularity;
    if name_matches_any(&poi.name, &preferences.must_visit) {
        score += MUST_VISIT_BONUS;
    }
    if !preferences.attraction_types.is_empty() && poi.has_tag_in(&preferences.attraction_types) {
        score += PREFERRED_TYPE_BONUS;
    }
    score
}

/// Whether a group can visit this POI at all
fn suitable_for_group(poi: &CandidatePoi, group: &Group) -> bool {
    if group.children > 0 && !poi.child_friendly {
        return false;
    }
    if group.elderly > 0 && !poi.elderly_friendly {
        return false;
    }
    true
}

/// Fuzzy name match: substring containment in either direction,
/// case-insensitive
pub(crate) fn name_matches_any(name: &str, entries: &[String]) -> bool {
    let name = name.to_lowercase();
    entries.iter().any(|entry| {
        let entry = entry.trim().to_lowercase();
        !entry.is_empty() && (name.contains(&entry) || entry.contains(&name))
    })
}

fn matches_avoid(poi: &CandidatePoi, avoid: &[String]) -> bool {
    if name_matches_any(&poi.name, avoid) {
        return true;
    }
    poi.has_tag_in(avoid)
}
