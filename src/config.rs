//! Engine configuration surface (spec §6 "Configuration surface").
//!
//! Layered env/file configuration via `ortho_config`, the same crate the
//! teacher uses for its own layered configuration; a small `clap` CLI
//! derive sits alongside for local/ops invocation.

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

/// Engine-wide runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POI_ENGINE")]
pub struct EngineConfig {
    /// Enables the optional enrichment pass over validated results.
    #[serde(default)]
    pub enable_extended_enrichment: bool,

    /// Enables the optional LLM-backed marine name-extraction path
    /// (enhanced mode).
    #[serde(default)]
    pub enable_llm_filter: bool,

    /// Selects the alternate web-search backend for diving-site discovery
    /// within the marine sub-pipeline (spec §6 `ENABLE_CSE_DIVE_WRECK`).
    /// Does not gate whether the marine sub-pipeline runs at all; that is
    /// controlled by the request's `extend_marine`/`marine_only` fields.
    #[serde(default)]
    pub enable_cse_dive_wreck: bool,

    /// Forces cache invalidation for the current request instead of
    /// reading a cached entry.
    #[serde(default)]
    pub invalidate_cache: bool,

    /// Model identifier passed to the configured LLM extractor adapter.
    #[serde(default)]
    pub llm_model: Option<String>,

    /// API key for the configured LLM extractor adapter. Never logged;
    /// wrap in `zeroize` at the adapter boundary.
    #[serde(default)]
    pub llm_api_key: Option<String>,

    /// Directory backing the filesystem cache.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Cache entry time-to-live, in seconds (spec §4.8, default 24h).
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Overpass API endpoint.
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,

    /// Wikipedia (or other MediaWiki encyclopedia) API endpoint.
    #[serde(default = "default_wiki_encyclopedia_url")]
    pub wiki_encyclopedia_url: String,

    /// Wikidata/Wikibase SPARQL endpoint.
    #[serde(default = "default_wikibase_sparql_url")]
    pub wikibase_sparql_url: String,

    /// DBpedia SPARQL endpoint.
    #[serde(default = "default_dbpedia_sparql_url")]
    pub dbpedia_sparql_url: String,

    /// Reverse/forward geocoder endpoint (Nominatim-compatible).
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    /// Web-search endpoint seeding the marine sub-pipeline
    /// (`ENABLE_CSE_DIVE_WRECK` alternate backend, spec §6).
    #[serde(default = "default_web_search_url")]
    pub web_search_url: String,

    /// API key for the configured web-search backend.
    #[serde(default)]
    pub web_search_api_key: Option<String>,

    /// Search-engine identifier for the configured web-search backend.
    #[serde(default)]
    pub web_search_engine_id: Option<String>,
}

fn default_cache_dir() -> String {
    ".poi-engine-cache".to_string()
}

const fn default_cache_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_wiki_encyclopedia_url() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_wikibase_sparql_url() -> String {
    "https://query.wikidata.org/sparql".to_string()
}

fn default_dbpedia_sparql_url() -> String {
    "https://dbpedia.org/sparql".to_string()
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_web_search_url() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

/// Local/ops CLI surface, wrapping the library's `Engine` without
/// requiring the out-of-scope HTTP façade.
#[derive(Debug, clap::Parser)]
#[command(name = "poi-engine-cli", about = "Semantic POI aggregation engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Runs the engine's liveness/readiness self-check.
    Health,
    /// Runs a search over a zone described by a JSON request file.
    Search {
        /// Path to a JSON-encoded `SearchRequest`.
        #[arg(long)]
        request: String,
    },
    /// Lists the municipalities discovered within a zone.
    DiscoverMunicipalities {
        #[arg(long)]
        request: String,
    },
}
