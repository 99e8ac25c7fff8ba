//! DTOs for the MediaWiki `action=query&list=geosearch` response.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::model::{Accessibility, Poi, PoiKind, PoiSource};
use crate::domain::validator::calculate_relevance_score;

#[derive(Debug, Deserialize)]
pub(super) struct GeosearchResponseDto {
    #[serde(default)]
    pub(super) query: Option<GeosearchQueryDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeosearchQueryDto {
    #[serde(default)]
    pub(super) geosearch: Vec<GeosearchHitDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeosearchHitDto {
    pub(super) pageid: i64,
    pub(super) title: String,
    pub(super) lat: f64,
    pub(super) lon: f64,
}

impl GeosearchResponseDto {
    pub(super) fn into_pois(self) -> Vec<Poi> {
        self.query
            .map(|query| query.geosearch)
            .unwrap_or_default()
            .into_iter()
            .filter(|hit| hit.lat.is_finite() && hit.lon.is_finite())
            .map(GeosearchHitDto::into_poi)
            .collect()
    }
}

impl GeosearchHitDto {
    fn into_poi(self) -> Poi {
        let mut external_ids = BTreeMap::new();
        external_ids.insert("pageid".to_string(), self.pageid.to_string());

        let mut poi = Poi {
            name: self.title,
            lat: self.lat,
            lng: self.lon,
            kind: PoiKind::Land,
            marine_subkind: None,
            source: PoiSource::WikiEncyclopedia,
            description: String::new(),
            depth: None,
            accessibility: Accessibility::default(),
            relevance_score: 0.0,
            external_ids,
            language_tag: None,
        };
        poi.relevance_score = calculate_relevance_score(&poi);
        poi
    }
}
