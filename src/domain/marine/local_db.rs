//! Built-in marine POI database, seeded zone-by-zone (supplemented
//! feature, SPEC_FULL §1, grounded in
//! `original_source/.../marine_explorer.py`'s
//! `MarinePOICollector.known_marine_pois`). Acts as a zero-network
//! fallback and as a seed merged alongside the live web-search path.

use crate::domain::model::{
    Accessibility, AccessibilityLevel, Depth, DepthUnit, MarineSubkind, Poi, PoiKind, PoiSource,
};
use crate::domain::validator::calculate_relevance_score;

struct KnownWreck {
    zone_key: &'static str,
    name: &'static str,
    lat: f64,
    lng: f64,
    depth_m: f64,
    description: &'static str,
}

const KNOWN_WRECKS: &[KnownWreck] = &[KnownWreck {
    zone_key: "golfo dei poeti",
    name: "Relitto della Mohawk Deer",
    lat: 44.0342,
    lng: 9.8956,
    depth_m: 32.0,
    description: "Cargo ship wreck lying at 32 meters, a well known technical diving site.",
}];

/// Returns the built-in marine POIs for `zone_name`, matched by a
/// case-insensitive substring comparison against each entry's zone key.
#[must_use]
pub fn lookup(zone_name: &str) -> Vec<Poi> {
    let zone_lower = zone_name.to_lowercase();
    KNOWN_WRECKS
        .iter()
        .filter(|wreck| zone_lower.contains(wreck.zone_key) || wreck.zone_key.contains(&zone_lower))
        .map(|wreck| {
            let mut poi = Poi {
                name: wreck.name.to_string(),
                lat: wreck.lat,
                lng: wreck.lng,
                kind: PoiKind::Marine,
                marine_subkind: Some(MarineSubkind::Wreck),
                source: PoiSource::LocalDb,
                description: wreck.description.to_string(),
                depth: Some(Depth { value: wreck.depth_m, unit: DepthUnit::Meters }),
                accessibility: Accessibility {
                    level: AccessibilityLevel::Advanced,
                    requirements: String::new(),
                },
                relevance_score: 0.0,
                external_ids: Default::default(),
                language_tag: None,
            };
            poi.relevance_score = calculate_relevance_score(&poi);
            poi
        })
        .collect()
}
