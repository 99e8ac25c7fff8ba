//! DTOs for the SPARQL JSON results format (`results.bindings`).

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::model::{Accessibility, Poi, PoiKind, PoiSource};
use crate::domain::validator::calculate_relevance_score;

#[derive(Debug, Deserialize)]
pub(super) struct SparqlResultsDto {
    pub(super) results: SparqlBindingsDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct SparqlBindingsDto {
    #[serde(default)]
    pub(super) bindings: Vec<BTreeMap<String, SparqlValueDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SparqlValueDto {
    pub(super) value: String,
}

impl SparqlResultsDto {
    pub(super) fn into_pois(self, source: PoiSource, kind: PoiKind) -> Vec<Poi> {
        self.results
            .bindings
            .into_iter()
            .filter_map(|binding| binding_to_poi(&binding, source, kind))
            .collect()
    }
}

fn binding_to_poi(binding: &BTreeMap<String, SparqlValueDto>, source: PoiSource, kind: PoiKind) -> Option<Poi> {
    let lat: f64 = binding.get("lat")?.value.parse().ok()?;
    let lng: f64 = binding.get("lon")?.value.parse().ok()?;
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }

    let name = binding
        .get("itemLabel")
        .map(|value| value.value.clone())
        .unwrap_or_else(|| binding.get("item").map(|value| value.value.clone()).unwrap_or_default());
    let description = binding.get("desc").map(|value| value.value.clone()).unwrap_or_default();

    let mut external_ids = BTreeMap::new();
    if let Some(item) = binding.get("item") {
        external_ids.insert("uri".to_string(), item.value.clone());
    }

    let mut poi = Poi {
        name,
        lat,
        lng,
        kind,
        marine_subkind: None,
        source,
        description,
        depth: None,
        accessibility: Accessibility::default(),
        relevance_score: 0.0,
        external_ids,
        language_tag: None,
    };
    poi.relevance_score = calculate_relevance_score(&poi);
    Some(poi)
}
