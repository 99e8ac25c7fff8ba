//! Municipality discovery and decomposition (spec C5).
//!
//! Two discovery paths feed a single merged list: OSM administrative-
//! boundary tags already present on fetched land POIs, and forward-geocode
//! lookups seeded by geographic-indicator terms (gulf, bay, coast, riviera)
//! built from the zone name, grounded in
//! `original_source/.../geo_municipal.py`'s
//! `MunicipalityDiscoverer.discover_municipalities_in_zone` and
//! `_build_municipality_search_terms`.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::geometry::centroid;
use crate::domain::model::{GeographicContext, Municipality, Poi, TourismLevel, Vertex};
use crate::domain::ports::ReverseGeocoder;

/// Hamlet/fraction to containing-municipality mapping, seeded from
/// `geo_municipal.py`'s `fraction_mappings` default table. Configurable
/// deployments may extend this via `EngineConfig`; this is the built-in
/// default (SPEC_FULL §4.5).
pub const DEFAULT_HAMLET_TO_MUNICIPALITY: &[(&str, &str)] = &[
    ("fezzano", "porto venere"),
    ("san terenzo", "lerici"),
    ("tellaro", "lerici"),
    ("cadimare", "la spezia"),
    ("marola", "la spezia"),
    ("fossola", "la spezia"),
    ("le grazie", "porto venere"),
];

/// Geographic-indicator terms used to expand the zone name into forward-
/// geocode search terms (spec §4.5, grounded in
/// `_build_municipality_search_terms`).
const GEOGRAPHIC_INDICATORS: &[&str] = &["golfo", "baia", "costa", "riviera", "gulf", "bay", "coast"];

/// Resolves a raw administrative name to its containing municipality via
/// the hamlet table, falling back to the name itself (trimmed and
/// lowercased) when no mapping exists.
#[must_use]
pub fn resolve_municipality_name(raw: &str, hamlet_table: &[(&str, &str)]) -> String {
    let normalized = raw.trim().to_lowercase();
    for (hamlet, municipality) in hamlet_table {
        if normalized == *hamlet || normalized.contains(hamlet) {
            return (*municipality).to_string();
        }
    }
    normalized
}

/// Builds the set of forward-geocode search terms for `zone_name`:
/// the bare name plus each geographic-indicator compound.
#[must_use]
pub fn build_municipality_search_terms(zone_name: &str) -> Vec<String> {
    let mut terms = vec![zone_name.to_string()];
    for indicator in GEOGRAPHIC_INDICATORS {
        terms.push(format!("{indicator} di {zone_name}"));
        terms.push(format!("{zone_name} {indicator}"));
    }
    terms
}

/// Estimates how many POIs a municipality is likely to contribute, from
/// its observed POI count in this search plus a tourism-level multiplier
/// (decision recorded in DESIGN.md: the spec names this formula without
/// fixing its coefficients).
#[must_use]
pub fn estimate_poi_count(observed: u32, tourism_level: TourismLevel) -> u32 {
    let multiplier = match tourism_level {
        TourismLevel::High => 1.5,
        TourismLevel::Medium => 1.2,
        TourismLevel::Low => 1.0,
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let estimate = (f64::from(observed) * multiplier).round() as u32;
    estimate.max(observed)
}

/// Classifies tourism level from an observed POI count: more POIs implies
/// a more heavily documented, likely higher-tourism area.
#[must_use]
pub fn classify_tourism_level(observed: u32) -> TourismLevel {
    if observed >= 15 {
        TourismLevel::High
    } else if observed >= 5 {
        TourismLevel::Medium
    } else {
        TourismLevel::Low
    }
}

/// Classifies the geographic context of a municipality from its centroid
/// and whether the zone was extended toward the sea. `is_coastal` comes
/// from the orchestrator's bbox/marine decision; UNESCO/protected-area
/// context requires data this module does not have, so it defaults to
/// [`GeographicContext::Generic`] unless `is_coastal` is set.
#[must_use]
pub fn classify_geographic_context(is_coastal: bool) -> GeographicContext {
    if is_coastal {
        GeographicContext::Coastal
    } else {
        GeographicContext::Generic
    }
}

/// Groups `land_pois` by their `addr:city`/`addr:municipality` external id
/// (set by the OSM adapter from element tags), resolving hamlets to their
/// containing municipality, and attaches forward-geocode-discovered
/// municipalities that had zero OSM-tagged POIs.
pub async fn discover_municipalities(
    zone_name: &str,
    polygon: &[Vertex],
    land_pois: &[Poi],
    is_coastal: bool,
    geocoder: &dyn ReverseGeocoder,
    hamlet_table: &[(&str, &str)],
) -> Vec<Municipality> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for poi in land_pois {
        let Some(raw_city) = poi
            .external_ids
            .get("addr:city")
            .or_else(|| poi.external_ids.get("addr:municipality"))
        else {
            continue;
        };
        let resolved = resolve_municipality_name(raw_city, hamlet_table);
        *counts.entry(resolved).or_insert(0) += 1;
    }

    let mut discovered_names: BTreeSet<String> = counts.keys().cloned().collect();
    for term in build_municipality_search_terms(zone_name) {
        if let Ok(hits) = geocoder.forward_geocode(&term).await {
            if !hits.is_empty() {
                discovered_names.insert(resolve_municipality_name(&term, hamlet_table));
            }
        }
    }

    let zone_centroid = centroid(polygon);
    discovered_names
        .into_iter()
        .map(|name| {
            let observed = counts.get(&name).copied().unwrap_or(0);
            let tourism_level = classify_tourism_level(observed);
            Municipality {
                name,
                subdivisions: Vec::new(),
                poi_count_estimate: estimate_poi_count(observed, tourism_level),
                tourism_level,
                geographic_context: classify_geographic_context(is_coastal),
                centroid: Some(zone_centroid),
            }
        })
        .collect()
}
