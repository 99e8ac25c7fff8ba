//! General web-search adapter seeding the marine sub-pipeline (spec C2.6,
//! §4.6.1). Speaks the Google Programmable Search Engine JSON API shape —
//! `items[].{link,title,snippet}` — the de facto standard most CSE-style
//! providers mirror, including the `ENABLE_CSE_DIVE_WRECK` alternate backend
//! named in §6.

mod dto;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::domain::ports::{WebSearchClient, WebSearchError, WebSearchHit};
use crate::outbound::http::{self, RetryableError};

use dto::SearchResponseDto;

impl RetryableError for WebSearchError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Max results requested per query; the marine seeder only keeps the first
/// few accepted diving-center URLs regardless (spec §4.6.1).
const RESULT_COUNT: u32 = 10;

pub struct CseWebSearchClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    engine_id: String,
}

impl CseWebSearchClient {
    #[must_use]
    pub fn new(endpoint: Url, api_key: String, engine_id: String) -> Self {
        Self { client: http::build_client(http::DEFAULT_TIMEOUT), endpoint, api_key, engine_id }
    }
}

#[async_trait]
impl WebSearchClient for CseWebSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchHit>, WebSearchError> {
        http::with_retry(|| async {
            let response = self
                .client
                .get(self.endpoint.clone())
                .query(&[
                    ("key", self.api_key.as_str()),
                    ("cx", self.engine_id.as_str()),
                    ("q", query),
                    ("num", &RESULT_COUNT.to_string()),
                ])
                .send()
                .await
                .map_err(map_transport_error)?;

            let status = response.status();
            let body = response.bytes().await.map_err(map_transport_error)?;
            if !status.is_success() {
                return Err(map_status_error(status));
            }
            let decoded: SearchResponseDto = serde_json::from_slice(&body)
                .map_err(|err| WebSearchError::decode(format!("invalid search JSON: {err}")))?;
            Ok(decoded.into_hits())
        })
        .await
    }
}

fn map_transport_error(error: reqwest::Error) -> WebSearchError {
    if error.is_timeout() {
        WebSearchError::timeout()
    } else {
        WebSearchError::transport(error.to_string())
    }
}

fn map_status_error(status: reqwest::StatusCode) -> WebSearchError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        WebSearchError::rate_limited()
    } else if status.is_client_error() {
        WebSearchError::invalid_request(format!("status {}", status.as_u16()))
    } else {
        WebSearchError::transport(format!("status {}", status.as_u16()))
    }
}
