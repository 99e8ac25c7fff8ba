//! Reverse/forward geocoder adapter (spec C2.5), grounded in the Nominatim
//! `jsonv2` wire format named in §6: `…/reverse?format=jsonv2&lat=&lon=&zoom=&addressdetails=1`.

mod dto;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::domain::ports::{ReverseGeocodeResult, ReverseGeocoder, ReverseGeocoderError};
use crate::outbound::http::{self, RetryableError};

use dto::{ReverseGeocodeResponseDto, SearchResultDto};

impl RetryableError for ReverseGeocoderError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// OSM address-detail zoom level for reverse lookups: city/town granularity.
const DEFAULT_ZOOM: u8 = 14;

pub struct NominatimGeocoder {
    client: Client,
    base_url: Url,
}

impl NominatimGeocoder {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self { client: http::build_client(http::REVERSE_GEOCODE_TIMEOUT), base_url }
    }

    fn endpoint(&self, path: &str) -> Url {
        self.base_url.join(path).unwrap_or_else(|_| self.base_url.clone())
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<ReverseGeocodeResult, ReverseGeocoderError> {
        let url = self.endpoint("reverse");
        http::with_retry(|| async {
            let response = self
                .client
                .get(url.clone())
                .query(&[
                    ("format", "jsonv2"),
                    ("lat", &lat.to_string()),
                    ("lon", &lng.to_string()),
                    ("zoom", &DEFAULT_ZOOM.to_string()),
                    ("addressdetails", "1"),
                ])
                .send()
                .await
                .map_err(map_transport_error)?;

            let status = response.status();
            let body = response.bytes().await.map_err(map_transport_error)?;
            if !status.is_success() {
                return Err(map_status_error(status));
            }
            let decoded: ReverseGeocodeResponseDto = serde_json::from_slice(&body)
                .map_err(|err| ReverseGeocoderError::decode(format!("invalid reverse-geocode JSON: {err}")))?;
            Ok(decoded.into_result())
        })
        .await
    }

    async fn forward_geocode(&self, query: &str) -> Result<Vec<(f64, f64)>, ReverseGeocoderError> {
        let url = self.endpoint("search");
        http::with_retry(|| async {
            let response = self
                .client
                .get(url.clone())
                .query(&[("format", "jsonv2"), ("q", query)])
                .send()
                .await
                .map_err(map_transport_error)?;

            let status = response.status();
            let body = response.bytes().await.map_err(map_transport_error)?;
            if !status.is_success() {
                return Err(map_status_error(status));
            }
            let decoded: Vec<SearchResultDto> = serde_json::from_slice(&body)
                .map_err(|err| ReverseGeocoderError::decode(format!("invalid forward-geocode JSON: {err}")))?;
            Ok(decoded
                .into_iter()
                .filter_map(|hit| hit.coordinates())
                .collect())
        })
        .await
    }
}

fn map_transport_error(error: reqwest::Error) -> ReverseGeocoderError {
    if error.is_timeout() {
        ReverseGeocoderError::timeout()
    } else {
        ReverseGeocoderError::transport(error.to_string())
    }
}

fn map_status_error(status: reqwest::StatusCode) -> ReverseGeocoderError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ReverseGeocoderError::rate_limited()
    } else {
        ReverseGeocoderError::transport(format!("status {}", status.as_u16()))
    }
}
