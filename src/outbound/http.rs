//! Shared HTTP transport: timeout, retry, and user-agent policy common to
//! every provider adapter (spec §4.2), grounded in the Overpass adapter's
//! `reqwest::Client::builder().timeout(...)` pattern.

use std::time::Duration;

use reqwest::{Client, StatusCode};

/// Default per-request timeout for most providers (spec §4.2).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shorter timeout used only by the reverse geocoder, which is called far
/// more often (once per marine candidate) and must not stall the pipeline.
pub const REVERSE_GEOCODE_TIMEOUT: Duration = Duration::from_secs(3);

/// Maximum retry attempts after the first request.
pub const MAX_RETRIES: u32 = 3;

/// Fixed back-off between retries (spec §4.2: "fixed 2s backoff").
pub const RETRY_BACKOFF: Duration = Duration::from_secs(2);

pub const USER_AGENT: &str = "poi-engine/0.1 (+https://example.invalid/poi-engine)";

/// Builds a `reqwest::Client` with the shared timeout and user-agent.
///
/// # Panics
/// Panics if the TLS backend fails to initialize, which only happens on a
/// broken build environment.
#[must_use]
pub fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .expect("reqwest client must build with a valid TLS backend")
}

/// Returns `true` for status codes worth retrying: 429 and 5xx.
#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Runs `request` up to `MAX_RETRIES` additional times on retryable
/// failures, sleeping [`RETRY_BACKOFF`] between attempts.
pub async fn with_retry<T, E, F, Fut>(mut request: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: RetryableError,
{
    let mut attempt = 0;
    loop {
        match request().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_RETRIES && err.is_retryable() => {
                attempt += 1;
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Error types that can self-report whether a retry is worthwhile.
pub trait RetryableError {
    fn is_retryable(&self) -> bool;
}
