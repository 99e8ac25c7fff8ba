//! POI validation and relevance scoring (spec C3).
//!
//! Keyword lists and scoring constants are taken verbatim from
//! `original_source/.../utils.py` (`POIValidator`,
//! `TOURIST_KEYWORDS`/`MARINE_KEYWORDS`) and
//! `marine_explorer.py` (`known_irrelevant_wrecks`, the surface-exclusion
//! list for web-search hits).

use crate::domain::model::Poi;

/// Keywords whose presence in a POI's text surface marks it as
/// tourist-relevant (spec §4.3.1).
pub const TOURIST_KEYWORDS: &[&str] = &[
    "museo", "church", "castello", "torre", "palazzo", "villa", "giardino", "parco", "spiaggia",
    "porto", "faro", "monastero", "chiesa", "cathedral", "monument", "archaeological", "historic",
    "fortress", "abbey", "sanctuary", "viewpoint", "panorama", "belvedere", "acquario", "zoo",
    "theatre", "teatro", "cinema", "gallery", "galleria", "library", "biblioteca",
];

/// Keywords associated with marine/underwater subjects (spec §4.3.3).
pub const MARINE_KEYWORDS: &[&str] = &[
    "relitto",
    "wreck",
    "shipwreck",
    "faro",
    "lighthouse",
    "boa",
    "buoy",
    "secca",
    "reef",
    "shoal",
    "immersion",
    "diving",
    "subacqueo",
    "underwater",
];

/// Additional indicators that relax the underwater test for web-search
/// results, which rarely use the core `MARINE_KEYWORDS` vocabulary
/// (spec §4.6, grounded in `marine_explorer.py`'s web-search dedup path).
pub const WEB_SEARCH_UNDERWATER_INDICATORS: &[&str] = &[
    "destinazioni subacquee",
    "diving site",
    "relitto",
    "wreck",
    "shipwreck",
    "naufragio",
    "underwater",
    "subacqueo",
    "immersion",
    "scuba",
];

/// Keywords marking a candidate's text surface as a land/surface feature
/// (port, lighthouse, beach, ...) rather than a genuinely underwater one
/// (spec §4.3/§8 surface-vs-underwater test, grounded in
/// `marine_explorer.py`'s `_is_underwater_poi` surface-exclusion list).
pub const SURFACE_KEYWORDS: &[&str] = &[
    "port", "harbour", "marina", "lighthouse", "beach", "bay", "cape", "island", "city", "town",
    "coast", "promontory",
];

const PRESTIGE_KEYWORDS: &[&str] =
    &["unesco", "world heritage", "national", "famous", "historic"];

/// Known-irrelevant wreck geofence: a name that matches these patterns is
/// treated as a false positive if its coordinates fall in the associated
/// bounding box, per `marine_explorer.py`'s `known_irrelevant_wrecks`
/// (the canonical example is the cruiser *Moskva*, whose English/Russian/
/// Italian name variants surface in generic wreck searches even though it
/// sank in the Black Sea, nowhere near most requested zones).
struct IrrelevantWreck {
    name_fragments: &'static [&'static str],
    lat_range: (f64, f64),
    lng_range: (f64, f64),
}

const KNOWN_IRRELEVANT_WRECKS: &[IrrelevantWreck] = &[IrrelevantWreck {
    name_fragments: &["moskva", "moscova", "moscow", "москва"],
    lat_range: (44.0, 45.0),
    lng_range: (28.0, 35.0),
}];

/// Returns `true` if the POI's text surface contains a tourist-relevance
/// keyword.
#[must_use]
pub fn is_tourist_relevant(poi: &Poi) -> bool {
    let surface = poi.text_surface();
    TOURIST_KEYWORDS.iter().any(|kw| surface.contains(kw))
}

/// Returns `true` if the POI's text surface contains a marine keyword.
/// `lenient` widens the vocabulary with [`WEB_SEARCH_UNDERWATER_INDICATORS`]
/// for sources (like web search) that rarely use the core wordlist.
#[must_use]
pub fn is_underwater_relevant(poi: &Poi, lenient: bool) -> bool {
    let surface = poi.text_surface();
    let base = MARINE_KEYWORDS.iter().any(|kw| surface.contains(kw));
    if base || !lenient {
        return base;
    }
    WEB_SEARCH_UNDERWATER_INDICATORS.iter().any(|kw| surface.contains(kw))
}

/// Returns `true` if the POI's text surface names a surface feature
/// ([`SURFACE_KEYWORDS`]) with no accompanying underwater indicator (spec
/// §8: `surface_keywords ∩ text(p) = ∅ or underwater_keywords ∩ text(p) ≠
/// ∅`) — i.e. the candidate should be rejected as a false positive (a
/// lighthouse or harbour mention, not a wreck). A POI mentioning both a
/// surface keyword and an underwater keyword (e.g. "wreck near the
/// lighthouse") is not excluded.
#[must_use]
pub fn is_surface_excluded(poi: &Poi, lenient: bool) -> bool {
    let surface = poi.text_surface();
    let has_surface_keyword = SURFACE_KEYWORDS.iter().any(|kw| surface.contains(kw));
    has_surface_keyword && !is_underwater_relevant(poi, lenient)
}

/// Returns `true` if `name`/coordinates match a known-irrelevant wreck
/// geofence, i.e. the POI should be dropped even though its name matched a
/// wreck search.
#[must_use]
pub fn is_known_irrelevant_wreck(name: &str, lat: f64, lng: f64) -> bool {
    let lower = name.to_lowercase();
    KNOWN_IRRELEVANT_WRECKS.iter().any(|entry| {
        entry.name_fragments.iter().any(|frag| lower.contains(frag))
            && (entry.lat_range.0..=entry.lat_range.1).contains(&lat)
            && (entry.lng_range.0..=entry.lng_range.1).contains(&lng)
    })
}

/// Computes the relevance score for a POI (spec §4.3.2): source weight
/// times a description-length bonus, plus a flat bonus per prestige
/// keyword present, clamped to `[1.0, 5.0]`.
#[must_use]
pub fn calculate_relevance_score(poi: &Poi) -> f64 {
    let mut score = poi.source.relevance_weight();

    let len = poi.description.len();
    if len > 100 {
        score += 0.8;
    } else if len > 50 {
        score += 0.4;
    }

    let surface = poi.text_surface();
    for keyword in PRESTIGE_KEYWORDS {
        if surface.contains(keyword) {
            score += 0.3;
        }
    }

    score.clamp(1.0, 5.0)
}

/// Applies the full validation gate for a land POI: must be tourist
/// relevant. Marine POIs are validated separately by
/// [`crate::domain::marine`] using [`is_underwater_relevant`] and
/// [`is_known_irrelevant_wreck`].
#[must_use]
pub fn is_valid_land_poi(poi: &Poi) -> bool {
    is_tourist_relevant(poi)
}
