//! Diving-center page fetcher (spec C2.7, §4.6.2): strips script/style/nav/
//! footer/header elements and returns the remaining visible text for the
//! name-extraction pipeline, grounded in the original implementation's
//! `BeautifulSoup` stripping of the same element set.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::domain::ports::{DivingPageFetcher, DivingPageFetcherError};
use crate::outbound::http::{self, RetryableError};

impl RetryableError for DivingPageFetcherError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Tags whose subtree never carries extractable prose.
const STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

pub struct HttpDivingPageFetcher {
    client: Client,
}

impl HttpDivingPageFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self { client: http::build_client(http::DEFAULT_TIMEOUT) }
    }
}

impl Default for HttpDivingPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DivingPageFetcher for HttpDivingPageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, DivingPageFetcherError> {
        http::with_retry(|| async {
            let response = self.client.get(url).send().await.map_err(map_transport_error)?;
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DivingPageFetcherError::not_found());
            }
            if !status.is_success() {
                return Err(map_status_error(status));
            }
            let body = response.text().await.map_err(map_transport_error)?;
            Ok(extract_visible_text(&body))
        })
        .await
    }
}

/// Parses `html`, drops [`STRIPPED_TAGS`] subtrees, and joins the remaining
/// text nodes with single spaces.
fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(stripped_selector) = Selector::parse(&STRIPPED_TAGS.join(", ")) else {
        return String::new();
    };
    let stripped_ids: std::collections::HashSet<_> = document
        .select(&stripped_selector)
        .flat_map(|el| el.descendants())
        .map(|node| node.id())
        .collect();

    let mut words = Vec::new();
    for node in document.tree.nodes() {
        if stripped_ids.contains(&node.id()) {
            continue;
        }
        if let Some(text_node) = node.value().as_text() {
            let trimmed = text_node.trim();
            if !trimmed.is_empty() {
                words.push(trimmed);
            }
        }
    }
    words.join(" ")
}

fn map_transport_error(error: reqwest::Error) -> DivingPageFetcherError {
    if error.is_timeout() {
        DivingPageFetcherError::timeout()
    } else {
        DivingPageFetcherError::transport(error.to_string())
    }
}

fn map_status_error(status: reqwest::StatusCode) -> DivingPageFetcherError {
    DivingPageFetcherError::transport(format!("status {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_nav_content() {
        let html = r#"
            <html><body>
                <nav>Home | About</nav>
                <script>console.log('x')</script>
                <p>Relitto Mohawk Deer lies at 32 metres.</p>
                <footer>Contact us</footer>
            </body></html>
        "#;
        let text = extract_visible_text(html);
        assert!(text.contains("Relitto Mohawk Deer lies at 32 metres."));
        assert!(!text.contains("Home"));
        assert!(!text.contains("console.log"));
        assert!(!text.contains("Contact us"));
    }

    #[test]
    fn empty_document_yields_empty_text() {
        assert_eq!(extract_visible_text("<html></html>"), "");
    }
}
