//! POI deduplication (spec C4).
//!
//! Grounded in `original_source/.../utils.py`'s `POIDeduplicator`: a
//! distance threshold merges nearby POIs, name similarity merges
//! same-place-different-source duplicates further apart, and a
//! source-priority table breaks ties when two candidates are judged the
//! same place.

use crate::domain::geometry::geodesic_distance_m;
use crate::domain::model::Poi;

/// Distance, in meters, under which two POIs are considered the same
/// physical place regardless of name (spec §4.4).
pub const DISTANCE_THRESHOLD_M: f64 = 50.0;

/// Wider distance threshold used only when names are judged similar, since
/// a shared well-known name (e.g. a named wreck) may be reported at
/// slightly different coordinates by different sources (grounded in
/// `marine_explorer.py`'s 100m substring-match dedup radius).
pub const NAME_MATCH_DISTANCE_THRESHOLD_M: f64 = 100.0;

/// Returns `true` if two names are considered duplicates: exact match
/// (case-insensitive), one a substring of the other, or Jaccard
/// token-overlap similarity above 0.5.
#[must_use]
pub fn name_similarity(a: &str, b: &str) -> bool {
    let a_norm = a.trim().to_lowercase();
    let b_norm = b.trim().to_lowercase();
    if a_norm.is_empty() || b_norm.is_empty() {
        return false;
    }
    if a_norm == b_norm {
        return true;
    }
    if a_norm.contains(&b_norm) || b_norm.contains(&a_norm) {
        return true;
    }
    jaccard_token_similarity(&a_norm, &b_norm) > 0.5
}

fn jaccard_token_similarity(a: &str, b: &str) -> f64 {
    use std::collections::HashSet;
    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    #[allow(clippy::cast_precision_loss)]
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Returns `true` if `candidate` should replace `incumbent` when the two
/// are judged duplicates: higher source priority wins, ties broken by
/// description length (spec §4.4 tie-break order).
#[must_use]
pub fn is_better_poi(candidate: &Poi, incumbent: &Poi) -> bool {
    let candidate_priority = candidate.source.dedup_priority();
    let incumbent_priority = incumbent.source.dedup_priority();
    match candidate_priority.cmp(&incumbent_priority) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => candidate.description.len() > incumbent.description.len(),
    }
}

/// Deduplicates `pois` in place order, keeping the better of any two
/// judged duplicates by distance and/or name similarity.
#[must_use]
pub fn deduplicate(pois: Vec<Poi>) -> Vec<Poi> {
    let mut kept: Vec<Poi> = Vec::with_capacity(pois.len());
    for candidate in pois {
        let mut merged = false;
        for incumbent in &mut kept {
            let distance = geodesic_distance_m(candidate.lat, candidate.lng, incumbent.lat, incumbent.lng);
            let same_name = name_similarity(&candidate.name, &incumbent.name);
            let duplicate = same_name
                && (distance <= DISTANCE_THRESHOLD_M || distance <= NAME_MATCH_DISTANCE_THRESHOLD_M);
            if duplicate {
                if is_better_poi(&candidate, incumbent) {
                    *incumbent = candidate.clone();
                }
                merged = true;
                break;
            }
        }
        if !merged {
            kept.push(candidate);
        }
    }
    kept
}
