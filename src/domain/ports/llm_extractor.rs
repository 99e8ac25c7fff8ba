//! Optional LLM-backed marine POI extraction port (enhanced mode, spec §4.6.4).
//!
//! The crate only defines the interface; no implementation of an LLM call
//! ships here (out of scope per SPEC_FULL §1). Callers inject a concrete
//! adapter, or run with `enable_llm_filter = false` and skip this port
//! entirely.

use async_trait::async_trait;

use super::macros::define_port_error;

define_port_error! {
    pub enum LlmExtractorError {
        Transport { message: String } => "llm transport error: {message}",
        Timeout => "llm request timed out",
        Decode { message: String } => "could not decode llm response: {message}",
        InvalidRequest { message: String } => "invalid llm request: {message}",
    }
}

impl LlmExtractorError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout)
    }
}

/// A single POI candidate extracted from free text by the LLM, before
/// coordinate/water validation.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmExtractedPoi {
    pub name: String,
    pub confidence: f64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub depth_text: Option<String>,
}

/// Extracts candidate marine POI names from diving-page text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmExtractor: Send + Sync {
    /// Extracts candidates from `page_text`, scoped to `municipality`.
    ///
    /// # Errors
    /// Returns [`LlmExtractorError`] on transport failure, timeout, or an
    /// undecodable response. Never returns candidates with
    /// `confidence < 0.0` or `> 1.0`.
    async fn extract(
        &self,
        municipality: &str,
        page_text: &str,
    ) -> Result<Vec<LlmExtractedPoi>, LlmExtractorError>;
}
