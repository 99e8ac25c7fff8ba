//! Marine sub-pipeline (spec C6).
//!
//! Seeds diving-center pages per municipality via web search, fetches and
//! parses each page for wreck/reef/lighthouse names, locates them with a
//! coordinate-window regex or (enhanced mode) an LLM extractor, validates
//! candidates with [`crate::domain::validator`], and attaches depth and
//! accessibility metadata. Grounded in
//! `original_source/.../marine_explorer.py` and `web_search.py`.

pub mod coords;
pub mod depth;
pub mod extract;
pub mod llm_mode;
pub mod local_db;
pub mod seed;

use crate::domain::dedup::{deduplicate, name_similarity};
use crate::domain::model::{
    Accessibility, AccessibilityLevel, MarineSubkind, Poi, PoiKind, PoiSource, Vertex,
};
use crate::domain::ports::{
    DivingPageFetcher, LlmExtractor, ReverseGeocoder, WebSearchClient,
};
use crate::domain::validator::{
    calculate_relevance_score, is_known_irrelevant_wreck, is_surface_excluded, is_underwater_relevant,
};

/// Route taken through the marine pipeline for this zone, recorded for
/// [`crate::domain::model::MarineAnalysis`] (spec §8 scenario 2).
pub const ROUTE_LOCAL_DB: &str = "local_db";
pub const ROUTE_WEB_SEARCH: &str = "web_search";
pub const ROUTE_LLM_ENHANCED: &str = "llm_enhanced";

/// Minimum confidence an LLM-extracted candidate must carry to be kept
/// (spec §4.6.4 enhanced mode).
pub const LLM_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Runs the marine sub-pipeline for a zone, returning validated marine
/// POIs and the route(s) that contributed to the result.
#[allow(clippy::too_many_arguments)]
pub async fn run(
    zone_name: &str,
    polygon: &[Vertex],
    municipalities: &[String],
    search: &dyn WebSearchClient,
    fetcher: &dyn DivingPageFetcher,
    geocoder: &dyn ReverseGeocoder,
    llm: Option<&dyn LlmExtractor>,
    enhanced_mode: bool,
) -> (Vec<Poi>, Vec<String>) {
    let mut route = Vec::new();
    let mut candidates = local_db::lookup(zone_name);
    if !candidates.is_empty() {
        route.push(ROUTE_LOCAL_DB.to_string());
    }

    for municipality in municipalities {
        let queries = seed::build_semantic_queries(municipality);
        for query in queries {
            let Ok(hits) = search.search(&query).await else { continue };
            for hit in hits {
                if !seed::is_domain_allowed(&hit.url) {
                    continue;
                }
                let Ok(text) = fetcher.fetch_text(&hit.url).await else { continue };

                if enhanced_mode {
                    if let Some(llm) = llm {
                        if let Ok(extracted) = llm.extract(municipality, &text).await {
                            route.push(ROUTE_LLM_ENHANCED.to_string());
                            for item in llm_mode::filter_confident_candidates(extracted) {
                                let (Some(lat), Some(lng)) = (item.lat, item.lng) else {
                                    continue;
                                };
                                candidates.push(build_poi(
                                    item.name,
                                    lat,
                                    lng,
                                    PoiSource::WebSearch,
                                    &text,
                                    item.depth_text.as_deref(),
                                ));
                            }
                            continue;
                        }
                    }
                }

                route.push(ROUTE_WEB_SEARCH.to_string());
                for name in extract::extract_wreck_names(&text) {
                    let Some((lat, lng)) = coords::extract_coordinate_window(&text, &name) else {
                        continue;
                    };
                    candidates.push(build_poi(name, lat, lng, PoiSource::WebSearch, &text, None));
                }
            }
        }
    }

    let validated = validate_candidates(candidates, geocoder).await;
    let deduped = deduplicate(validated);
    route.dedup();
    (deduped, route)
}

fn build_poi(
    name: String,
    lat: f64,
    lng: f64,
    source: PoiSource,
    page_text: &str,
    depth_hint: Option<&str>,
) -> Poi {
    let depth = depth_hint.and_then(depth::parse_depth).or_else(|| depth::parse_depth(page_text));
    let accessibility = depth.map_or(Accessibility::default(), |d| Accessibility {
        level: accessibility_for_depth(d.meters()),
        requirements: String::new(),
    });
    let mut poi = Poi {
        name,
        lat,
        lng,
        kind: PoiKind::Marine,
        marine_subkind: Some(MarineSubkind::Wreck),
        source,
        description: snippet_around(page_text, 200),
        depth,
        accessibility,
        relevance_score: 0.0,
        external_ids: Default::default(),
        language_tag: None,
    };
    poi.relevance_score = calculate_relevance_score(&poi);
    poi
}

fn accessibility_for_depth(meters: f64) -> AccessibilityLevel {
    if meters < 18.0 {
        AccessibilityLevel::Easy
    } else if meters < 30.0 {
        AccessibilityLevel::Moderate
    } else if meters < 40.0 {
        AccessibilityLevel::Advanced
    } else {
        AccessibilityLevel::Expert
    }
}

fn snippet_around(text: &str, max_len: usize) -> String {
    text.chars().take(max_len).collect()
}

/// Drops candidates that match the known-irrelevant-wreck geofence, fail
/// the surface-vs-underwater test (a surface-only mention like a
/// lighthouse or harbour, with no underwater keyword), fail the lenient
/// underwater-keyword test, or (when the coordinate genuinely sits over
/// land per the reverse geocoder) the water check — applied leniently: any
/// reverse-geocode failure or ambiguity is treated as "assume water"
/// rather than rejecting the candidate, preserving the spec's §9 Open
/// Question decision.
async fn validate_candidates(candidates: Vec<Poi>, geocoder: &dyn ReverseGeocoder) -> Vec<Poi> {
    let mut kept = Vec::with_capacity(candidates.len());
    for poi in candidates {
        if is_known_irrelevant_wreck(&poi.name, poi.lat, poi.lng) {
            continue;
        }
        if is_surface_excluded(&poi, true) {
            continue;
        }
        if !is_underwater_relevant(&poi, true) {
            continue;
        }
        if is_over_water(&poi, geocoder).await {
            kept.push(poi);
        }
    }
    kept
}

async fn is_over_water(poi: &Poi, geocoder: &dyn ReverseGeocoder) -> bool {
    const LAND_INDICATORS: &[&str] = &[
        "city", "town", "village", "hamlet", "suburb", "neighbourhood", "road", "building",
        "house", "farm", "residential",
    ];
    match geocoder.reverse_geocode(poi.lat, poi.lng).await {
        Ok(result) => match result.land_indicator {
            Some(indicator) => !LAND_INDICATORS.contains(&indicator.as_str()),
            None => true,
        },
        Err(_) => true,
    }
}

/// Re-exported for callers that only need duplicate-name merging without
/// the full distance-based dedup pass (e.g. seeding from multiple queries
/// for the same municipality).
#[must_use]
pub fn names_are_duplicates(a: &str, b: &str) -> bool {
    name_similarity(a, b)
}
