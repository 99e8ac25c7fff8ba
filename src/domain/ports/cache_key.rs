//! Validated cache key newtype.

use std::fmt;

use thiserror::Error;

/// A non-empty, surrounding-whitespace-free cache key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyValidationError {
    #[error("cache key must not be empty")]
    Empty,
    #[error("cache key must not have leading or trailing whitespace")]
    SurroundingWhitespace,
}

impl CacheKey {
    /// Validates and wraps `value`.
    ///
    /// # Errors
    /// Returns [`CacheKeyValidationError`] if `value` is empty or has
    /// leading/trailing whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CacheKeyValidationError::Empty);
        }
        if value.trim() != value {
            return Err(CacheKeyValidationError::SurroundingWhitespace);
        }
        Ok(Self(value))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("zone:abc123")]
    #[case("a")]
    fn accepts_valid_keys(#[case] input: &str) {
        assert!(CacheKey::new(input).is_ok());
    }

    #[rstest]
    #[case("", CacheKeyValidationError::Empty)]
    #[case(" leading", CacheKeyValidationError::SurroundingWhitespace)]
    #[case("trailing ", CacheKeyValidationError::SurroundingWhitespace)]
    fn rejects_invalid_keys(#[case] input: &str, #[case] expected: CacheKeyValidationError) {
        assert_eq!(CacheKey::new(input), Err(expected));
    }

    #[test]
    fn displays_as_inner_string() {
        let key = CacheKey::new("zone:abc123").expect("valid key");
        assert_eq!(key.to_string(), "zone:abc123");
        assert_eq!(key.as_ref(), "zone:abc123");
    }
}
