//! Optional enrichment pass over validated results (spec §4.7,
//! `enable_extended_enrichment`).
//!
//! Enrichment rewrites thin descriptions into fuller prose via a pluggable
//! text-rewriting port; the rewriting implementation itself is out of
//! scope (SPEC_FULL §1) — only the interface and the selection policy
//! (which POIs need it, and that enhanced mode skips it) live here.

use async_trait::async_trait;

use crate::domain::model::Poi;
use crate::domain::ports::define_port_error;

define_port_error! {
    pub enum DescriptionEnricherError {
        Transport { message: String } => "enrichment transport error: {message}",
        Timeout => "enrichment request timed out",
    }
}

/// Descriptions shorter than this are considered thin enough to enrich.
pub const THIN_DESCRIPTION_THRESHOLD: usize = 40;

/// Rewrites a POI's description into fuller, more informative prose.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DescriptionEnricher: Send + Sync {
    /// # Errors
    /// Returns [`DescriptionEnricherError`] on transport failure or
    /// timeout. Never propagated as a fatal error by
    /// [`enrich_if_needed`] — failures are logged and the original
    /// description is kept.
    async fn rewrite(&self, poi: &Poi) -> Result<String, DescriptionEnricherError>;
}

/// Returns `true` if `poi` is a good enrichment candidate: its
/// description is present but thin.
#[must_use]
pub fn needs_enrichment(poi: &Poi) -> bool {
    !poi.description.is_empty() && poi.description.len() < THIN_DESCRIPTION_THRESHOLD
}

/// Enriches `poi` in place if it qualifies, swallowing enricher failures
/// (spec §7: enrichment is best-effort, never fatal to the search result).
pub async fn enrich_if_needed(poi: &mut Poi, enricher: &dyn DescriptionEnricher) {
    if !needs_enrichment(poi) {
        return;
    }
    if let Ok(rewritten) = enricher.rewrite(poi).await {
        poi.description = rewritten;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Accessibility, PoiKind, PoiSource};

    fn poi(description: &str) -> Poi {
        Poi {
            name: "x".to_string(),
            lat: 0.0,
            lng: 0.0,
            kind: PoiKind::Land,
            marine_subkind: None,
            source: PoiSource::Osm,
            description: description.to_string(),
            depth: None,
            accessibility: Accessibility::default(),
            relevance_score: 1.0,
            external_ids: Default::default(),
            language_tag: None,
        }
    }

    #[test]
    fn thin_non_empty_description_needs_enrichment() {
        assert!(needs_enrichment(&poi("a small museum")));
    }

    #[test]
    fn empty_description_is_not_enriched() {
        assert!(!needs_enrichment(&poi("")));
    }

    #[test]
    fn long_description_does_not_need_enrichment() {
        assert!(!needs_enrichment(&poi(&"a".repeat(100))));
    }

    #[tokio::test]
    async fn enrich_if_needed_replaces_thin_description_on_success() {
        let mut mock = MockDescriptionEnricher::new();
        mock.expect_rewrite()
            .returning(|_| Ok("a much fuller rewritten description".to_string()));
        let mut p = poi("short");
        enrich_if_needed(&mut p, &mock).await;
        assert_eq!(p.description, "a much fuller rewritten description");
    }

    #[tokio::test]
    async fn enrich_if_needed_keeps_original_on_failure() {
        let mut mock = MockDescriptionEnricher::new();
        mock.expect_rewrite().returning(|_| Err(DescriptionEnricherError::timeout()));
        let mut p = poi("short");
        enrich_if_needed(&mut p, &mock).await;
        assert_eq!(p.description, "short");
    }
}
