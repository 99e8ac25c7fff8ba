//! Provider client ports (spec C2).
//!
//! Every external data source is reached through one of these narrow
//! traits. A shared [`ProviderClient`] trait lets the orchestrator fan out
//! over a closed `enum ProviderKind` (spec §9 REDESIGN FLAGS) without trait
//! object reflection; concrete adapters implement both their specific port
//! and `ProviderClient`.

use async_trait::async_trait;

use crate::domain::geometry::BoundingBox;
use crate::domain::model::Poi;

use super::macros::define_port_error;

define_port_error! {
    pub enum OverpassClientError {
        Transport { message: String } => "overpass transport error: {message}",
        Timeout => "overpass request timed out",
        RateLimited => "overpass rate limit exceeded",
        Decode { message: String } => "could not decode overpass response: {message}",
        InvalidRequest { message: String } => "invalid overpass query: {message}",
    }
}

define_port_error! {
    pub enum SparqlClientError {
        Transport { message: String } => "sparql transport error: {message}",
        Timeout => "sparql request timed out",
        RateLimited => "sparql rate limit exceeded",
        Decode { message: String } => "could not decode sparql response: {message}",
        InvalidRequest { message: String } => "invalid sparql query: {message}",
    }
}

define_port_error! {
    pub enum WikiEncyclopediaError {
        Transport { message: String } => "wiki encyclopedia transport error: {message}",
        Timeout => "wiki encyclopedia request timed out",
        RateLimited => "wiki encyclopedia rate limit exceeded",
        Decode { message: String } => "could not decode wiki encyclopedia response: {message}",
        InvalidRequest { message: String } => "invalid wiki encyclopedia query: {message}",
    }
}

define_port_error! {
    pub enum ReverseGeocoderError {
        Transport { message: String } => "reverse geocoder transport error: {message}",
        Timeout => "reverse geocoder request timed out",
        RateLimited => "reverse geocoder rate limit exceeded",
        Decode { message: String } => "could not decode reverse geocoder response: {message}",
    }
}

define_port_error! {
    pub enum WebSearchError {
        Transport { message: String } => "web search transport error: {message}",
        Timeout => "web search request timed out",
        RateLimited => "web search rate limit exceeded",
        Decode { message: String } => "could not decode web search response: {message}",
        InvalidRequest { message: String } => "invalid web search query: {message}",
    }
}

define_port_error! {
    pub enum DivingPageFetcherError {
        Transport { message: String } => "diving page fetch transport error: {message}",
        Timeout => "diving page fetch timed out",
        NotFound => "diving page not found",
        Decode { message: String } => "could not decode diving page body: {message}",
    }
}

impl OverpassClientError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout | Self::RateLimited)
    }
}
impl SparqlClientError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout | Self::RateLimited)
    }
}
impl WikiEncyclopediaError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout | Self::RateLimited)
    }
}
impl ReverseGeocoderError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout | Self::RateLimited)
    }
}
impl WebSearchError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout | Self::RateLimited)
    }
}
impl DivingPageFetcherError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout)
    }
}

/// Queries OpenStreetMap via an Overpass endpoint for land and marine
/// tagged elements within a bounding box.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OsmOverpassClient: Send + Sync {
    /// # Errors
    /// Returns [`OverpassClientError`] on transport failure or a malformed
    /// response. Never returns an error for zero matching elements.
    async fn fetch_land(&self, bbox: BoundingBox) -> Result<Vec<Poi>, OverpassClientError>;

    /// # Errors
    /// Same contract as [`OsmOverpassClient::fetch_land`], scoped to
    /// marine-tagged elements (wrecks, reefs, lighthouses, dive sites).
    async fn fetch_marine(&self, bbox: BoundingBox) -> Result<Vec<Poi>, OverpassClientError>;
}

/// Shared SPARQL port for Wikidata/Wikibase and DBpedia endpoints — both
/// speak the same query protocol, differing only in endpoint URL and
/// result-graph shape, which the adapter absorbs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SparqlClient: Send + Sync {
    /// # Errors
    /// Returns [`SparqlClientError`] on transport failure or a malformed
    /// response.
    ///
    /// `language` is an IETF language tag (e.g. `"it"`) selecting the
    /// `LANG()`/`wikibase:language` filter applied to labels and
    /// descriptions (spec §4.7 country-driven language selection).
    async fn fetch_pois(&self, bbox: BoundingBox, language: &str) -> Result<Vec<Poi>, SparqlClientError>;
}

/// Queries a MediaWiki-family encyclopedia (Wikipedia) for geosearch
/// results within a bounding box.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WikiEncyclopediaClient: Send + Sync {
    /// # Errors
    /// Returns [`WikiEncyclopediaError`] on transport failure or a
    /// malformed response.
    async fn geosearch(&self, bbox: BoundingBox) -> Result<Vec<Poi>, WikiEncyclopediaError>;
}

/// Result of a single reverse-geocode lookup (spec §4.6.5, water check).
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseGeocodeResult {
    pub display_name: String,
    pub land_indicator: Option<String>,
    /// ISO 3166-1 alpha-2 country code, when the upstream geocoder reports
    /// one (spec §4.7: drives wiki/SPARQL query language selection).
    pub country_code: Option<String>,
}

/// Reverse-geocodes a coordinate to determine whether it sits over land.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// # Errors
    /// Returns [`ReverseGeocoderError`] on transport failure, timeout, or a
    /// malformed response. Callers must treat any error as "unknown" and
    /// apply the lenient (assume-water) fallback themselves — this port
    /// does not swallow failures.
    async fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<ReverseGeocodeResult, ReverseGeocoderError>;

    /// Forward-geocodes a place name, used by municipality discovery.
    ///
    /// # Errors
    /// Returns [`ReverseGeocoderError`] on transport failure, timeout, or a
    /// malformed response.
    async fn forward_geocode(&self, query: &str) -> Result<Vec<(f64, f64)>, ReverseGeocoderError>;
}

/// A single hit from a general-purpose web search, seeding marine
/// diving-center page discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct WebSearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Issues web searches used to seed the marine sub-pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearchClient: Send + Sync {
    /// # Errors
    /// Returns [`WebSearchError`] on transport failure or a malformed
    /// response.
    async fn search(&self, query: &str) -> Result<Vec<WebSearchHit>, WebSearchError>;
}

/// Fetches the textual content of a diving-center page for name/depth
/// extraction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DivingPageFetcher: Send + Sync {
    /// # Errors
    /// Returns [`DivingPageFetcherError`] on transport failure, timeout, a
    /// 404, or undecodable content.
    async fn fetch_text(&self, url: &str) -> Result<String, DivingPageFetcherError>;
}

/// Error raised uniformly to the orchestrator's fan-out, wrapping whichever
/// concrete port error a [`ProviderClient`] adapter hit. Individual
/// adapters keep their typed errors internally and only flatten to this
/// shape at the `ProviderClient` boundary, so `is_retryable` still reflects
/// the original taxonomy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    pub retryable: bool,
}

impl ProviderError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.retryable
    }
}

macro_rules! impl_from_port_error {
    ($err:ty) => {
        impl From<$err> for ProviderError {
            fn from(err: $err) -> Self {
                Self {
                    retryable: err.is_retryable(),
                    message: err.to_string(),
                }
            }
        }
    };
}
impl_from_port_error!(OverpassClientError);
impl_from_port_error!(SparqlClientError);
impl_from_port_error!(WikiEncyclopediaError);
impl_from_port_error!(WebSearchError);
impl_from_port_error!(DivingPageFetcherError);

/// Uniform view over a provider used by the orchestrator's fan-out (spec
/// §4.2, §9 REDESIGN FLAGS). Concrete adapters implement both their
/// specific port (above) and this trait, delegating `fetch_land`/
/// `fetch_marine` to the typed method and flattening the error via
/// [`ProviderError`]'s `From` impls.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Stable identifier used in logs and `sources_used` statistics.
    fn name(&self) -> &'static str;

    /// Whether this provider can serve marine-tagged POIs at all; providers
    /// that can't (e.g. a land-only encyclopedia geosearch) are skipped
    /// during the marine sub-pipeline's provider fan-out.
    fn supports_marine(&self) -> bool;

    /// `language` is an IETF language tag selected from the detected
    /// country (spec §4.7); adapters that have no notion of query language
    /// (e.g. OSM tag queries) ignore it.
    ///
    /// # Errors
    /// Returns [`ProviderError`] if the underlying call failed; `retryable`
    /// reflects whether the orchestrator may retry against this provider.
    async fn fetch_land(&self, bbox: BoundingBox, language: &str) -> Result<Vec<Poi>, ProviderError>;

    /// # Errors
    /// Same contract as [`ProviderClient::fetch_land`]. Implementors for
    /// which `supports_marine` is `false` should return an empty vector
    /// rather than an error.
    async fn fetch_marine(&self, bbox: BoundingBox, language: &str) -> Result<Vec<Poi>, ProviderError>;
}
