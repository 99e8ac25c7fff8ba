//! DTOs for the CSE-style JSON search response.

use serde::Deserialize;

use crate::domain::ports::WebSearchHit;

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponseDto {
    #[serde(default)]
    pub(super) items: Vec<SearchItemDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchItemDto {
    pub(super) link: String,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) snippet: String,
}

impl SearchResponseDto {
    pub(super) fn into_hits(self) -> Vec<WebSearchHit> {
        self.items
            .into_iter()
            .map(|item| WebSearchHit { url: item.link, title: item.title, snippet: item.snippet })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_items_into_hits() {
        let body = r#"{"items":[{"link":"https://diving.example/","title":"Diving Center","snippet":"wrecks nearby"}]}"#;
        let decoded: SearchResponseDto = serde_json::from_str(body).expect("valid JSON");
        let hits = decoded.into_hits();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://diving.example/");
    }

    #[test]
    fn missing_items_decodes_to_empty_list() {
        let decoded: SearchResponseDto = serde_json::from_str("{}").expect("valid JSON");
        assert!(decoded.into_hits().is_empty());
    }
}
