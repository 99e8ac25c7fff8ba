//! Enhanced-mode LLM extraction support (spec §4.6.4).
//!
//! The LLM call itself lives behind [`crate::domain::ports::LlmExtractor`];
//! this module only holds the confidence gate applied to its output.

use crate::domain::ports::LlmExtractedPoi;

use super::LLM_CONFIDENCE_THRESHOLD;

/// Keeps only candidates at or above [`LLM_CONFIDENCE_THRESHOLD`] that also
/// carry coordinates — a candidate with no location can't become a POI.
#[must_use]
pub fn filter_confident_candidates(candidates: Vec<LlmExtractedPoi>) -> Vec<LlmExtractedPoi> {
    candidates
        .into_iter()
        .filter(|c| c.confidence >= LLM_CONFIDENCE_THRESHOLD && c.lat.is_some() && c.lng.is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(confidence: f64, has_coords: bool) -> LlmExtractedPoi {
        LlmExtractedPoi {
            name: "Test Wreck".to_string(),
            confidence,
            lat: has_coords.then_some(44.0),
            lng: has_coords.then_some(9.0),
            depth_text: None,
        }
    }

    #[test]
    fn drops_low_confidence_candidates() {
        let result = filter_confident_candidates(vec![candidate(0.1, true), candidate(0.5, true)]);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn drops_candidates_without_coordinates() {
        let result = filter_confident_candidates(vec![candidate(0.9, false)]);
        assert!(result.is_empty());
    }
}
