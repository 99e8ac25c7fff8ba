//! Domain error representation shared across adapters.
//!
//! Keep this module free from HTTP or framework concerns so the same error
//! shape can be returned by the library's public API, the CLI, or any
//! future façade built on top of it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Stable machine-readable error code (spec §7 taxonomy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation (bad polygon, empty
    /// zone name, contradictory flags).
    InvalidRequest,
    /// A required upstream data source could not be reached or returned an
    /// unusable response; the operation may still have produced a partial
    /// result.
    UnavailableSource,
    /// The operation completed with a reduced result because one or more
    /// optional sources failed (distinct from `UnavailableSource`, which is
    /// fatal to the operation).
    Partial,
    /// An unexpected internal error.
    Internal,
}

/// Domain error payload returned by every fallible public operation.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
/// - `trace_id`, when present, must be non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    EmptyMessage,
    EmptyTraceId,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
            Self::EmptyTraceId => write!(f, "trace identifier must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// # Panics
    /// Panics if `message` is empty once trimmed. Use [`Self::try_new`] at
    /// any boundary where the message isn't a compile-time literal.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    ///
    /// # Errors
    /// Returns [`ErrorValidationError::EmptyMessage`] if `message` is empty
    /// once trimmed.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self { code, message, trace_id: None, details: None })
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// # Panics
    /// Panics if `id` is empty once trimmed. Use [`Self::try_with_trace_id`]
    /// when the id isn't a compile-time literal.
    #[must_use]
    pub fn with_trace_id(self, id: impl Into<String>) -> Self {
        match self.try_with_trace_id(id) {
            Ok(value) => value,
            Err(err) => panic!("trace identifiers must satisfy validation: {err}"),
        }
    }

    /// Fallible variant of [`Self::with_trace_id`].
    ///
    /// # Errors
    /// Returns [`ErrorValidationError::EmptyTraceId`] if `id` is empty once
    /// trimmed.
    pub fn try_with_trace_id(
        mut self,
        id: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        self.trace_id = Some(id);
        Ok(self)
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    #[must_use]
    pub fn unavailable_source(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnavailableSource, message)
    }

    #[must_use]
    pub fn partial(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Partial, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Supplies a trace id only if one isn't already present.
    ///
    /// # Errors
    /// Returns [`ErrorValidationError::EmptyTraceId`] if `trace_id` is
    /// `Some` but empty once trimmed.
    pub fn with_optional_trace_id(
        self,
        trace_id: Option<String>,
    ) -> Result<Self, ErrorValidationError> {
        match trace_id {
            Some(id) => self.try_with_trace_id(id),
            None => Ok(self),
        }
    }

    /// Redacts server-side detail so the payload is safe to expose outside
    /// the crate. Internal errors keep their code and trace id but drop
    /// the message and structured details (spec §7 propagation policy).
    #[must_use]
    pub fn redacted_for_clients(&self) -> Self {
        if !matches!(self.code, ErrorCode::Internal) {
            return self.clone();
        }
        let mut redacted = self.clone();
        redacted.message = "internal error".to_string();
        redacted.details = None;
        redacted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(alias = "trace_id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            trace_id: value.trace_id,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto { code, message, trace_id, details } = value;

        let mut error = Self::try_new(code, message)?;
        if let Some(trace_id) = trace_id {
            error = error.try_with_trace_id(trace_id)?;
        } else {
            error.trace_id = None;
        }
        error.details = details;
        Ok(error)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn constructors_set_expected_code() {
        assert_eq!(Error::invalid_request("bad").code(), ErrorCode::InvalidRequest);
        assert_eq!(Error::unavailable_source("down").code(), ErrorCode::UnavailableSource);
        assert_eq!(Error::partial("reduced").code(), ErrorCode::Partial);
        assert_eq!(Error::internal("boom").code(), ErrorCode::Internal);
    }

    #[test]
    fn try_new_rejects_blank_message() {
        assert_eq!(
            Error::try_new(ErrorCode::Internal, "   "),
            Err(ErrorValidationError::EmptyMessage)
        );
    }

    #[rstest]
    #[case(ErrorCode::InvalidRequest)]
    #[case(ErrorCode::UnavailableSource)]
    #[case(ErrorCode::Partial)]
    fn redacted_for_clients_preserves_non_internal_errors(#[case] code: ErrorCode) {
        let err = Error::new(code, "detail").with_details(json!({ "field": "zone" }));
        let redacted = err.redacted_for_clients();
        assert_eq!(redacted.message(), "detail");
        assert!(redacted.details().is_some());
    }

    #[test]
    fn redacted_for_clients_strips_internal_detail() {
        let err = Error::internal("stack trace leaked").with_details(json!({ "line": 42 }));
        let redacted = err.redacted_for_clients();
        assert_eq!(redacted.message(), "internal error");
        assert!(redacted.details().is_none());
        assert_eq!(redacted.code(), ErrorCode::Internal);
    }

    #[test]
    fn dto_round_trip_preserves_fields() {
        let err = Error::invalid_request("bad zone")
            .with_trace_id("trace-1")
            .with_details(json!({ "reason": "empty polygon" }));
        let json = serde_json::to_string(&err).expect("serialize");
        let round_tripped: Error = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(round_tripped, err);
    }
}
