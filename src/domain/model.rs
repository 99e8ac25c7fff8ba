//! Canonical domain records shared across the pipeline.
//!
//! Purpose: define the POI/Municipality/request/result shapes the rest of
//! the crate operates on. Keep these types free of provider- or
//! transport-specific concerns; adapters translate into and out of them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Land or marine classification of a POI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiKind {
    Land,
    Marine,
}

/// Marine-only sub-classification, present only when `kind == Marine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarineSubkind {
    Wreck,
    Reef,
    Lighthouse,
    DivingSite,
    Cave,
    Obstruction,
    MarinePoi,
}

/// Provider a POI was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiSource {
    Osm,
    WikiEncyclopedia,
    Wikibase,
    Dbpedia,
    WebSearch,
    LocalDb,
    Generated,
}

impl PoiSource {
    /// Source trust weight used by the relevance scorer (spec §4.3).
    #[must_use]
    pub const fn relevance_weight(self) -> f64 {
        match self {
            Self::WikiEncyclopedia => 1.5,
            Self::Wikibase => 1.2,
            Self::Osm => 1.0,
            Self::Dbpedia | Self::WebSearch | Self::LocalDb | Self::Generated => 1.0,
        }
    }

    /// Dedup tie-break priority: higher wins (spec §4.4).
    #[must_use]
    pub const fn dedup_priority(self) -> u8 {
        match self {
            Self::WikiEncyclopedia => 3,
            Self::Wikibase => 2,
            Self::Osm => 1,
            Self::Dbpedia | Self::WebSearch | Self::LocalDb | Self::Generated => 0,
        }
    }

    /// Snake-case wire name, matching the `serde` rename used for this
    /// enum, for contexts (quality-analysis breakdowns) that need a
    /// string key rather than a typed variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Osm => "osm",
            Self::WikiEncyclopedia => "wiki_encyclopedia",
            Self::Wikibase => "wikibase",
            Self::Dbpedia => "dbpedia",
            Self::WebSearch => "web_search",
            Self::LocalDb => "local_db",
            Self::Generated => "generated",
        }
    }
}

/// Accessibility level for a POI, chiefly used by marine sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibilityLevel {
    Easy,
    Moderate,
    Advanced,
    Expert,
    Unknown,
}

impl Default for AccessibilityLevel {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Structured accessibility information for a POI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accessibility {
    pub level: AccessibilityLevel,
    #[serde(default)]
    pub requirements: String,
}

/// Depth measurement, value plus unit as parsed from free text (spec §4.6.6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Depth {
    pub value: f64,
    pub unit: DepthUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthUnit {
    Meters,
    Feet,
}

impl Depth {
    /// Normalise to meters for comparisons (depth buckets, filters).
    #[must_use]
    pub fn meters(self) -> f64 {
        match self.unit {
            DepthUnit::Meters => self.value,
            DepthUnit::Feet => self.value * 0.3048,
        }
    }
}

/// The central POI record (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub kind: PoiKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marine_subkind: Option<MarineSubkind>,
    pub source: PoiSource,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<Depth>,
    #[serde(default)]
    pub accessibility: Accessibility,
    pub relevance_score: f64,
    #[serde(default)]
    pub external_ids: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_tag: Option<String>,
}

impl Poi {
    /// Text surface used by keyword-matching filters: name + description + type.
    #[must_use]
    pub fn text_surface(&self) -> String {
        let type_text = match self.marine_subkind {
            Some(sub) => format!("{sub:?}"),
            None => String::new(),
        };
        format!(
            "{} {} {}",
            self.name.to_lowercase(),
            self.description.to_lowercase(),
            type_text.to_lowercase()
        )
    }
}

/// One administrative unit inside a requested zone (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    pub name: String,
    #[serde(default)]
    pub subdivisions: Vec<String>,
    pub poi_count_estimate: u32,
    pub tourism_level: TourismLevel,
    pub geographic_context: GeographicContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourismLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeographicContext {
    Coastal,
    UnescoHeritage,
    NaturalArea,
    ProtectedArea,
    Generic,
}

/// Search mode: `enhanced` dispatches marine page text to an LLM extractor
/// and disables enrichment (spec §4.6.4, §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Standard,
    Enhanced,
}

/// One vertex of a request polygon, `[lat, lng]`.
pub type Vertex = [f64; 2];

/// Inbound search request (spec §3, §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub zone_name: String,
    pub polygon: Vec<Vertex>,
    #[serde(default)]
    pub extend_marine: bool,
    #[serde(default)]
    pub marine_only: bool,
    #[serde(default)]
    pub enable_enrichment: bool,
    #[serde(default = "default_mode")]
    pub mode: SearchMode,
}

const fn default_mode() -> SearchMode {
    SearchMode::Standard
}

/// Country detected from the request polygon's centroid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// Aggregate counts returned alongside every search result (spec §6, §7).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStatistics {
    pub total: usize,
    pub land: usize,
    pub marine: usize,
    pub sources_used: Vec<PoiSource>,
}

/// Depth-bucket histogram used by `marine_analysis` (spec §8 scenario 2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthAnalysis {
    pub shallow_0_10m: u32,
    pub moderate_10_20m: u32,
    pub deep_20_30m: u32,
    pub very_deep_30_40m: u32,
    pub technical_40m_plus: u32,
}

impl DepthAnalysis {
    #[must_use]
    pub fn record(&mut self, meters: f64) {
        if meters < 10.0 {
            self.shallow_0_10m += 1;
        } else if meters < 20.0 {
            self.moderate_10_20m += 1;
        } else if meters < 30.0 {
            self.deep_20_30m += 1;
        } else if meters < 40.0 {
            self.very_deep_30_40m += 1;
        } else {
            self.technical_40m_plus += 1;
        }
    }
}

/// Summary of the marine sub-pipeline's contribution to a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarineAnalysis {
    pub route: Vec<String>,
    pub depth_analysis: DepthAnalysis,
    pub is_coastal: bool,
}

/// Breakdown of how many result POIs fall into each description-length
/// bucket, grounded in `semantic_search.py`'s `analyze_poi_quality`
/// (detailed >100 chars, basic >20 chars, else poor).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionQuality {
    pub detailed: usize,
    pub basic: usize,
    pub poor: usize,
}

/// Result of `analyze(search_result)` (spec §6), a post-hoc quality report
/// over an already-produced [`SearchResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub quality_score: f64,
    pub source_distribution: BTreeMap<String, usize>,
    pub description_quality: DescriptionQuality,
    pub recommendations: Vec<String>,
}

/// Outbound search result (spec §3, §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub zone_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
    pub municipalities: Vec<Municipality>,
    pub pois: Vec<Poi>,
    pub statistics: SearchStatistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marine_analysis: Option<MarineAnalysis>,
}
