//! DTOs for decoding Overpass JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into
//! domain [`Poi`] records in one pass.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::model::{Poi, PoiKind, PoiSource};
use crate::domain::validator::calculate_relevance_score;

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<OverpassElementDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementDto {
    #[serde(rename = "type")]
    pub(super) element_type: String,
    pub(super) id: i64,
    pub(super) lon: Option<f64>,
    pub(super) lat: Option<f64>,
    pub(super) center: Option<OverpassElementCenterDto>,
    #[serde(default)]
    pub(super) tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementCenterDto {
    pub(super) lon: f64,
    pub(super) lat: f64,
}

impl OverpassResponseDto {
    pub(super) fn into_pois(self, kind: PoiKind) -> Vec<Poi> {
        self.elements
            .into_iter()
            .filter_map(|element| element.into_poi(kind))
            .collect()
    }
}

impl OverpassElementDto {
    fn into_poi(self, kind: PoiKind) -> Option<Poi> {
        let (longitude, latitude) = self.coordinates()?;
        if !longitude.is_finite() || !latitude.is_finite() {
            return None;
        }

        let name = self.tags.get("name").cloned().unwrap_or_else(|| {
            format!("{} {}", self.element_type, self.id)
        });
        let description = self
            .tags
            .get("description")
            .or_else(|| self.tags.get("tourism"))
            .or_else(|| self.tags.get("historic"))
            .cloned()
            .unwrap_or_default();

        let mut external_ids = BTreeMap::new();
        external_ids.insert("osm_id".to_string(), self.id.to_string());
        for key in ["addr:city", "addr:municipality"] {
            if let Some(value) = self.tags.get(key) {
                external_ids.insert(key.to_string(), value.clone());
            }
        }

        let mut poi = Poi {
            name,
            lat: latitude,
            lng: longitude,
            kind,
            marine_subkind: None,
            source: PoiSource::Osm,
            description,
            depth: None,
            accessibility: crate::domain::model::Accessibility::default(),
            relevance_score: 0.0,
            external_ids,
            language_tag: None,
        };
        poi.relevance_score = calculate_relevance_score(&poi);
        Some(poi)
    }

    fn coordinates(&self) -> Option<(f64, f64)> {
        if let (Some(longitude), Some(latitude)) = (self.lon, self.lat) {
            return Some((longitude, latitude));
        }
        self.center.as_ref().map(|center| (center.lon, center.lat))
    }
}
