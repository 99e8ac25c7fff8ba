//! Reqwest-backed Overpass source adapter.
//!
//! This adapter owns transport details only: request serialisation,
//! timeout and HTTP error mapping, and JSON decoding into domain POIs.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::OverpassResponseDto;
use crate::domain::geometry::BoundingBox;
use crate::domain::model::{Poi, PoiKind};
use crate::domain::ports::{OsmOverpassClient, OverpassClientError, ProviderClient, ProviderError};
use crate::outbound::http::{self, RetryableError};

const QUERY_TIMEOUT_SECONDS: u32 = 60;
const USER_AGENT: &str = "poi-engine-overpass/0.1 (+https://example.invalid/poi-engine)";

/// Tag selectors for tourist-relevant land elements (spec §4.3.1 keyword
/// vocabulary mirrored as OSM tag keys).
const LAND_TAG_SELECTORS: &[&str] = &[
    "tourism", "historic", "amenity=place_of_worship", "leisure=park", "natural=beach",
];

/// Tag selectors for marine-relevant elements.
const MARINE_TAG_SELECTORS: &[&str] =
    &["historic=wreck", "man_made=lighthouse", "natural=reef", "sport=scuba_diving"];

impl RetryableError for OverpassClientError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Overpass source adapter that performs HTTP POST requests against one endpoint.
pub struct OverpassHttpSource {
    client: Client,
    endpoint: Url,
}

impl OverpassHttpSource {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self { client: http::build_client(http::DEFAULT_TIMEOUT), endpoint }
    }

    async fn fetch(&self, bbox: BoundingBox, kind: PoiKind) -> Result<Vec<Poi>, OverpassClientError> {
        let selectors = match kind {
            PoiKind::Land => LAND_TAG_SELECTORS,
            PoiKind::Marine => MARINE_TAG_SELECTORS,
        };
        let query = build_overpass_query(bbox, selectors, QUERY_TIMEOUT_SECONDS)?;

        http::with_retry(|| async {
            let response = self
                .client
                .post(self.endpoint.clone())
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .header(reqwest::header::ACCEPT, "application/json")
                .form(&[("data", query.clone())])
                .send()
                .await
                .map_err(map_transport_error)?;

            let status = response.status();
            let body = response.bytes().await.map_err(map_transport_error)?;
            if !status.is_success() {
                return Err(map_status_error(status, body.as_ref()));
            }
            parse_pois(body.as_ref(), kind)
        })
        .await
    }
}

#[async_trait]
impl OsmOverpassClient for OverpassHttpSource {
    async fn fetch_land(&self, bbox: BoundingBox) -> Result<Vec<Poi>, OverpassClientError> {
        self.fetch(bbox, PoiKind::Land).await
    }

    async fn fetch_marine(&self, bbox: BoundingBox) -> Result<Vec<Poi>, OverpassClientError> {
        self.fetch(bbox, PoiKind::Marine).await
    }
}

#[async_trait]
impl ProviderClient for OverpassHttpSource {
    fn name(&self) -> &'static str {
        "osm_overpass"
    }

    fn supports_marine(&self) -> bool {
        true
    }

    async fn fetch_land(&self, bbox: BoundingBox, _language: &str) -> Result<Vec<Poi>, ProviderError> {
        Ok(OsmOverpassClient::fetch_land(self, bbox).await?)
    }

    async fn fetch_marine(&self, bbox: BoundingBox, _language: &str) -> Result<Vec<Poi>, ProviderError> {
        Ok(OsmOverpassClient::fetch_marine(self, bbox).await?)
    }
}

fn parse_pois(body: &[u8], kind: PoiKind) -> Result<Vec<Poi>, OverpassClientError> {
    let decoded: OverpassResponseDto = serde_json::from_slice(body)
        .map_err(|error| OverpassClientError::decode(format!("invalid Overpass JSON payload: {error}")))?;
    Ok(decoded.into_pois(kind))
}

fn build_overpass_query(
    bbox: BoundingBox,
    selectors: &[&str],
    query_timeout_seconds: u32,
) -> Result<String, OverpassClientError> {
    validate_bounding_box(bbox)?;
    let bbox_clause = format!(
        "({min_lat},{min_lng},{max_lat},{max_lng})",
        min_lat = bbox.min_lat,
        min_lng = bbox.min_lng,
        max_lat = bbox.max_lat,
        max_lng = bbox.max_lng,
    );

    let tag_clauses: Result<Vec<_>, _> = selectors.iter().map(|tag| build_tag_selector(tag)).collect();
    let tag_clauses = tag_clauses?;

    let mut lines = Vec::with_capacity(tag_clauses.len() * 3);
    for selector in &tag_clauses {
        for element_type in ["node", "way", "relation"] {
            lines.push(format!("  {element_type}{selector}{bbox_clause};"));
        }
    }

    Ok(format!(
        "[out:json][timeout:{query_timeout_seconds}];\n(\n{query_lines}\n);\nout center tags;",
        query_lines = lines.join("\n")
    ))
}

fn validate_bounding_box(bbox: BoundingBox) -> Result<(), OverpassClientError> {
    let values = [bbox.min_lng, bbox.min_lat, bbox.max_lng, bbox.max_lat];
    if values.iter().any(|value| !value.is_finite()) {
        return Err(OverpassClientError::invalid_request("bounding box must contain finite coordinates"));
    }
    if bbox.min_lng >= bbox.max_lng || bbox.min_lat >= bbox.max_lat {
        return Err(OverpassClientError::invalid_request("bounding box min must be less than max"));
    }
    if !(-180.0..=180.0).contains(&bbox.min_lng) || !(-180.0..=180.0).contains(&bbox.max_lng) {
        return Err(OverpassClientError::invalid_request("longitude must be within [-180, 180]"));
    }
    if !(-90.0..=90.0).contains(&bbox.min_lat) || !(-90.0..=90.0).contains(&bbox.max_lat) {
        return Err(OverpassClientError::invalid_request("latitude must be within [-90, 90]"));
    }
    Ok(())
}

fn build_tag_selector(tag: &str) -> Result<String, OverpassClientError> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(OverpassClientError::invalid_request("tags must not include blank values"));
    }
    let (key, maybe_value) = match trimmed.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value.trim())),
        None => (trimmed, None),
    };
    let escaped_key = escape_quoted(key);
    match maybe_value {
        Some(value) => Ok(format!("[\"{escaped_key}\"=\"{}\"]", escape_quoted(value))),
        None => Ok(format!("[\"{escaped_key}\"]")),
    }
}

fn escape_quoted(raw: &str) -> String {
    raw.replace('\\', r"\\").replace('"', "\\\"")
}

fn map_transport_error(error: reqwest::Error) -> OverpassClientError {
    if error.is_timeout() {
        OverpassClientError::timeout()
    } else {
        OverpassClientError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> OverpassClientError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => OverpassClientError::rate_limited(),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => OverpassClientError::timeout(),
        _ if status.is_client_error() => OverpassClientError::invalid_request(message),
        _ => OverpassClientError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;
    let compact = String::from_utf8_lossy(body).split_whitespace().collect::<Vec<_>>().join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
