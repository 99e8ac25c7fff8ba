//! SPARQL adapter shared by the Wikibase and DBpedia Linked-Data endpoints
//! (spec C2.3/C2.4). Both speak the same query/result protocol — an HTTP GET
//! with a `query=` parameter, returning `results.bindings` JSON — differing
//! only in endpoint URL, query text, and whether they contribute land or
//! marine POIs.

mod dto;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::domain::geometry::BoundingBox;
use crate::domain::model::{Poi, PoiKind, PoiSource};
use crate::domain::ports::{ProviderClient, ProviderError, SparqlClient, SparqlClientError};
use crate::outbound::http::{self, RetryableError};

use dto::SparqlResultsDto;

impl RetryableError for SparqlClientError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Class IRIs the Wikibase query matches against (spec §4.2: castle,
/// museum, church, monument, tourist site, archaeological site, viewpoint,
/// lighthouse, shipwreck, palace, monastery, fort).
const WIKIBASE_TOURIST_CLASSES: &[&str] = &[
    "Q23413",    // castle
    "Q33506",    // museum
    "Q16970",    // church building
    "Q4989906",  // monument
    "Q1076486",  // tourist attraction
    "Q839954",   // archaeological site
    "Q511067",   // viewpoint
    "Q39715",    // lighthouse
    "Q850130",   // shipwreck
    "Q16560",    // palace
    "Q44613",    // monastery
    "Q57821",    // fort
];

/// DBpedia classes the marine-only query targets, explicitly excluding
/// lighthouses and ports/harbours (spec §4.2).
const DBPEDIA_MARINE_CLASSES: &[&str] = &["dbo:Shipwreck", "Reef"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SparqlDialect {
    Wikibase,
    Dbpedia,
}

/// SPARQL-backed adapter configured for one endpoint and one dialect.
pub struct SparqlHttpSource {
    client: Client,
    endpoint: Url,
    dialect: SparqlDialect,
    poi_source: PoiSource,
}

impl SparqlHttpSource {
    /// Adapter for the Wikibase knowledge-graph endpoint (land POIs only).
    #[must_use]
    pub fn wikibase(endpoint: Url) -> Self {
        Self {
            client: http::build_client(http::DEFAULT_TIMEOUT),
            endpoint,
            dialect: SparqlDialect::Wikibase,
            poi_source: PoiSource::Wikibase,
        }
    }

    /// Adapter for the DBpedia endpoint (marine POIs only).
    #[must_use]
    pub fn dbpedia(endpoint: Url) -> Self {
        Self {
            client: http::build_client(http::DEFAULT_TIMEOUT),
            endpoint,
            dialect: SparqlDialect::Dbpedia,
            poi_source: PoiSource::Dbpedia,
        }
    }

    fn build_query(&self, bbox: BoundingBox, language: &str) -> String {
        match self.dialect {
            SparqlDialect::Wikibase => build_wikibase_query(bbox, WIKIBASE_TOURIST_CLASSES, language),
            SparqlDialect::Dbpedia => build_dbpedia_query(bbox, DBPEDIA_MARINE_CLASSES, language),
        }
    }

    fn poi_kind(&self) -> PoiKind {
        match self.dialect {
            SparqlDialect::Wikibase => PoiKind::Land,
            SparqlDialect::Dbpedia => PoiKind::Marine,
        }
    }
}

#[async_trait]
impl SparqlClient for SparqlHttpSource {
    async fn fetch_pois(&self, bbox: BoundingBox, language: &str) -> Result<Vec<Poi>, SparqlClientError> {
        let query = self.build_query(bbox, language);
        http::with_retry(|| async {
            let response = self
                .client
                .get(self.endpoint.clone())
                .query(&[("query", query.as_str()), ("format", "json")])
                .header(reqwest::header::ACCEPT, "application/sparql-results+json")
                .send()
                .await
                .map_err(map_transport_error)?;

            let status = response.status();
            let body = response.bytes().await.map_err(map_transport_error)?;
            if !status.is_success() {
                return Err(map_status_error(status));
            }
            let decoded: SparqlResultsDto = serde_json::from_slice(&body)
                .map_err(|err| SparqlClientError::decode(format!("invalid SPARQL JSON: {err}")))?;
            Ok(decoded.into_pois(self.poi_source, self.poi_kind()))
        })
        .await
    }
}

#[async_trait]
impl ProviderClient for SparqlHttpSource {
    fn name(&self) -> &'static str {
        match self.dialect {
            SparqlDialect::Wikibase => "wikibase_sparql",
            SparqlDialect::Dbpedia => "dbpedia_sparql",
        }
    }

    fn supports_marine(&self) -> bool {
        self.dialect == SparqlDialect::Dbpedia
    }

    async fn fetch_land(&self, bbox: BoundingBox, language: &str) -> Result<Vec<Poi>, ProviderError> {
        match self.dialect {
            SparqlDialect::Wikibase => Ok(self.fetch_pois(bbox, language).await?),
            SparqlDialect::Dbpedia => Ok(Vec::new()),
        }
    }

    async fn fetch_marine(&self, bbox: BoundingBox, language: &str) -> Result<Vec<Poi>, ProviderError> {
        match self.dialect {
            SparqlDialect::Dbpedia => Ok(self.fetch_pois(bbox, language).await?),
            SparqlDialect::Wikibase => Ok(Vec::new()),
        }
    }
}

fn build_wikibase_query(bbox: BoundingBox, classes: &[&str], language: &str) -> String {
    let values = classes.iter().map(|class| format!("wd:{class}")).collect::<Vec<_>>().join(" ");
    format!(
        "SELECT ?item ?itemLabel ?lat ?lon ?desc WHERE {{\n  \
         VALUES ?class {{ {values} }}\n  \
         ?item wdt:P31 ?class .\n  \
         ?item p:P625/psv:P625 ?coord .\n  \
         ?coord wikibase:geoLatitude ?lat .\n  \
         ?coord wikibase:geoLongitude ?lon .\n  \
         FILTER(?lat >= {min_lat} && ?lat <= {max_lat} && ?lon >= {min_lng} && ?lon <= {max_lng})\n  \
         OPTIONAL {{ ?item schema:description ?desc . FILTER(LANG(?desc) = \"{language}\") }}\n  \
         SERVICE wikibase:label {{ bd:serviceParam wikibase:language \"{language}\" . }}\n}}",
        min_lat = bbox.min_lat,
        max_lat = bbox.max_lat,
        min_lng = bbox.min_lng,
        max_lng = bbox.max_lng,
    )
}

fn build_dbpedia_query(bbox: BoundingBox, classes: &[&str], language: &str) -> String {
    let class_filter = classes
        .iter()
        .map(|class| format!("?item a {class}"))
        .collect::<Vec<_>>()
        .join(" }} UNION {{ ");
    format!(
        "SELECT ?item ?itemLabel ?lat ?lon ?desc WHERE {{\n  \
         {{ {class_filter} }}\n  \
         ?item geo:lat ?lat ; geo:long ?lon .\n  \
         FILTER NOT EXISTS {{ ?item a dbo:Lighthouse }}\n  \
         FILTER NOT EXISTS {{ ?item a dbo:Port }}\n  \
         FILTER(?lat >= {min_lat} && ?lat <= {max_lat} && ?lon >= {min_lng} && ?lon <= {max_lng})\n  \
         OPTIONAL {{ ?item rdfs:label ?itemLabel . FILTER(LANG(?itemLabel) = \"{language}\") }}\n  \
         OPTIONAL {{ ?item dbo:abstract ?desc . FILTER(LANG(?desc) = \"{language}\") }}\n}}",
        min_lat = bbox.min_lat,
        max_lat = bbox.max_lat,
        min_lng = bbox.min_lng,
        max_lng = bbox.max_lng,
    )
}

fn map_transport_error(error: reqwest::Error) -> SparqlClientError {
    if error.is_timeout() {
        SparqlClientError::timeout()
    } else {
        SparqlClientError::transport(error.to_string())
    }
}

fn map_status_error(status: reqwest::StatusCode) -> SparqlClientError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        SparqlClientError::rate_limited()
    } else if status.is_client_error() {
        SparqlClientError::invalid_request(format!("status {}", status.as_u16()))
    } else {
        SparqlClientError::transport(format!("status {}", status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox { min_lat: 44.0, max_lat: 44.2, min_lng: 9.8, max_lng: 10.0 }
    }

    #[test]
    fn wikibase_query_includes_class_values_and_bbox_filter() {
        let query = build_wikibase_query(bbox(), &["Q23413", "Q39715"], "en");
        assert!(query.contains("wd:Q23413"));
        assert!(query.contains("wd:Q39715"));
        assert!(query.contains("?lat >= 44 && ?lat <= 44.2"));
    }

    #[test]
    fn wikibase_query_uses_the_requested_language() {
        let query = build_wikibase_query(bbox(), &["Q23413"], "it");
        assert!(query.contains("FILTER(LANG(?desc) = \"it\")"));
        assert!(query.contains("bd:serviceParam wikibase:language \"it\""));
    }

    #[test]
    fn dbpedia_query_excludes_lighthouse_and_port() {
        let query = build_dbpedia_query(bbox(), &["dbo:Shipwreck"], "en");
        assert!(query.contains("FILTER NOT EXISTS { ?item a dbo:Lighthouse }"));
        assert!(query.contains("FILTER NOT EXISTS { ?item a dbo:Port }"));
    }

    #[test]
    fn dbpedia_query_uses_the_requested_language() {
        let query = build_dbpedia_query(bbox(), &["dbo:Shipwreck"], "hr");
        assert!(query.contains("FILTER(LANG(?itemLabel) = \"hr\")"));
        assert!(query.contains("FILTER(LANG(?desc) = \"hr\")"));
    }

    #[test]
    fn wikibase_source_is_land_only() {
        let source = SparqlHttpSource::wikibase(Url::parse("https://example.invalid/sparql").unwrap());
        assert!(!source.supports_marine());
        assert_eq!(source.name(), "wikibase_sparql");
    }

    #[test]
    fn dbpedia_source_is_marine_only() {
        let source = SparqlHttpSource::dbpedia(Url::parse("https://example.invalid/sparql").unwrap());
        assert!(source.supports_marine());
        assert_eq!(source.name(), "dbpedia_sparql");
    }
}
