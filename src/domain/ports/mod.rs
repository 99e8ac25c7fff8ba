//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports are capability traits: the orchestrator and sub-pipelines depend on
//! these traits, never on concrete adapters, so outbound infrastructure can
//! be swapped or faked in tests without touching domain logic.

mod cache;
mod cache_key;
mod llm_extractor;
mod providers;

pub(crate) use macros::define_port_error;

mod macros;

pub use cache::{Cache, CacheEntry, CacheError};
pub use cache_key::{CacheKey, CacheKeyValidationError};
pub use llm_extractor::{LlmExtractedPoi, LlmExtractor, LlmExtractorError};
pub use providers::{
    DivingPageFetcher, DivingPageFetcherError, OsmOverpassClient, OverpassClientError,
    ProviderClient, ProviderError, ReverseGeocodeResult, ReverseGeocoder, ReverseGeocoderError,
    SparqlClient, SparqlClientError, WebSearchClient, WebSearchError, WebSearchHit,
    WikiEncyclopediaClient, WikiEncyclopediaError,
};

#[cfg(test)]
pub use providers::MockReverseGeocoder;
