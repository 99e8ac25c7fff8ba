//! Wiki-encyclopedia adapter (spec C2.2): MediaWiki `list=geosearch` over a
//! bounding box, land POIs only.

mod dto;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::domain::geometry::BoundingBox;
use crate::domain::model::Poi;
use crate::domain::ports::{ProviderClient, ProviderError, WikiEncyclopediaClient, WikiEncyclopediaError};
use crate::outbound::http::{self, RetryableError};

use dto::GeosearchResponseDto;

impl RetryableError for WikiEncyclopediaError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Maximum geosearch radius the MediaWiki API accepts, in metres.
const MAX_GEOSEARCH_RADIUS_M: u32 = 10_000;
const GEOSEARCH_RESULT_LIMIT: u32 = 50;

/// Bound to a single MediaWiki endpoint (and thus a single language
/// edition) for the lifetime of the adapter; switching editions per
/// request is a language-specific wiki-library wrapper concern, out of
/// scope here.
pub struct WikiEncyclopediaHttpSource {
    client: Client,
    endpoint: Url,
}

impl WikiEncyclopediaHttpSource {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self { client: http::build_client(http::DEFAULT_TIMEOUT), endpoint }
    }
}

#[async_trait]
impl WikiEncyclopediaClient for WikiEncyclopediaHttpSource {
    async fn geosearch(&self, bbox: BoundingBox) -> Result<Vec<Poi>, WikiEncyclopediaError> {
        let center_lat = bbox.mid_lat();
        let center_lng = (bbox.min_lng + bbox.max_lng) / 2.0;
        let radius = geosearch_radius_m(bbox);

        http::with_retry(|| async {
            let response = self
                .client
                .get(self.endpoint.clone())
                .query(&[
                    ("action", "query"),
                    ("list", "geosearch"),
                    ("gscoord", &format!("{center_lat}|{center_lng}")),
                    ("gsradius", &radius.to_string()),
                    ("gslimit", &GEOSEARCH_RESULT_LIMIT.to_string()),
                    ("format", "json"),
                ])
                .send()
                .await
                .map_err(map_transport_error)?;

            let status = response.status();
            let body = response.bytes().await.map_err(map_transport_error)?;
            if !status.is_success() {
                return Err(map_status_error(status));
            }
            let decoded: GeosearchResponseDto = serde_json::from_slice(&body)
                .map_err(|err| WikiEncyclopediaError::decode(format!("invalid geosearch JSON: {err}")))?;
            Ok(decoded.into_pois())
        })
        .await
    }
}

#[async_trait]
impl ProviderClient for WikiEncyclopediaHttpSource {
    fn name(&self) -> &'static str {
        "wiki_encyclopedia"
    }

    fn supports_marine(&self) -> bool {
        false
    }

    async fn fetch_land(&self, bbox: BoundingBox, _language: &str) -> Result<Vec<Poi>, ProviderError> {
        Ok(self.geosearch(bbox).await?)
    }

    async fn fetch_marine(&self, _bbox: BoundingBox, _language: &str) -> Result<Vec<Poi>, ProviderError> {
        Ok(Vec::new())
    }
}

fn geosearch_radius_m(bbox: BoundingBox) -> u32 {
    let diagonal_m = crate::domain::geometry::geodesic_distance_m(
        bbox.min_lat,
        bbox.min_lng,
        bbox.max_lat,
        bbox.max_lng,
    );
    let radius = (diagonal_m / 2.0).round() as u32;
    radius.clamp(1, MAX_GEOSEARCH_RADIUS_M)
}

fn map_transport_error(error: reqwest::Error) -> WikiEncyclopediaError {
    if error.is_timeout() {
        WikiEncyclopediaError::timeout()
    } else {
        WikiEncyclopediaError::transport(error.to_string())
    }
}

fn map_status_error(status: reqwest::StatusCode) -> WikiEncyclopediaError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        WikiEncyclopediaError::rate_limited()
    } else if status.is_client_error() {
        WikiEncyclopediaError::invalid_request(format!("status {}", status.as_u16()))
    } else {
        WikiEncyclopediaError::transport(format!("status {}", status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_clamped_to_api_maximum() {
        let huge = BoundingBox { min_lat: -10.0, max_lat: 10.0, min_lng: -10.0, max_lng: 10.0 };
        assert_eq!(geosearch_radius_m(huge), MAX_GEOSEARCH_RADIUS_M);
    }

    #[test]
    fn radius_is_at_least_one_metre() {
        let tiny = BoundingBox { min_lat: 44.0, max_lat: 44.0, min_lng: 9.0, max_lng: 9.0 };
        assert_eq!(geosearch_radius_m(tiny), 1);
    }
}
