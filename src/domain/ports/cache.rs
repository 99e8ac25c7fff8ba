//! Filesystem cache port (spec C8).

use async_trait::async_trait;

use super::cache_key::CacheKey;
use super::macros::define_port_error;

define_port_error! {
    pub enum CacheError {
        Io { message: String } => "cache io error: {message}",
        Decode { message: String } => "could not decode cached entry: {message}",
    }
}

/// A cached entry plus the metadata needed to decide whether it is still
/// usable (TTL expiry, content-aware invalidation for marine-only zones).
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub payload: Vec<u8>,
    pub stored_at_unix_secs: u64,
    pub content_fingerprint: String,
}

/// Atomic, TTL-bounded filesystem key-value cache (spec §4.8).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Cache: Send + Sync {
    /// # Errors
    /// Returns [`CacheError`] on I/O failure or an undecodable entry. A
    /// missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError>;

    /// Writes `payload` atomically (write-to-temp + rename), tagged with
    /// `content_fingerprint` for content-aware invalidation.
    ///
    /// # Errors
    /// Returns [`CacheError`] on I/O failure.
    async fn put(
        &self,
        key: &CacheKey,
        payload: Vec<u8>,
        content_fingerprint: String,
    ) -> Result<(), CacheError>;

    /// Removes a single entry, used when `invalidate_cache` is set.
    ///
    /// # Errors
    /// Returns [`CacheError`] on I/O failure. Removing an absent key is not
    /// an error.
    async fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError>;
}
