//! Filesystem-backed cache adapter (spec C8/§4.8).
//!
//! Each entry is one file named after the cache key's SHA-256 hash inside
//! `root_dir`, holding a small JSON header (stored timestamp, content
//! fingerprint) followed by the payload. Writes go to a sibling temp file
//! and are renamed into place, so a crash mid-write never leaves a
//! truncated entry for a concurrent reader to pick up.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::domain::ports::{Cache, CacheEntry, CacheError, CacheKey};

/// Cache header schema version (spec §9 open question: "an implementation
/// may replace [content heuristics] with an explicit version counter
/// embedded in the cache header, provided older entries are treated as
/// stale"). Entries written by a prior version lack this field and decode
/// to `0` via `serde(default)`, so a bump here invalidates the whole cache
/// without touching the content-token heuristic it sits alongside.
const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    stored_at_unix_secs: u64,
    content_fingerprint: String,
    payload: Vec<u8>,
    #[serde(default)]
    schema_version: u32,
}

/// Filesystem cache rooted at a directory created on first use.
#[derive(Debug, Clone)]
pub struct FsCache {
    root_dir: PathBuf,
}

impl FsCache {
    #[must_use]
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self { root_dir: root_dir.into() }
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_ref().as_bytes());
        let digest = hex::encode(hasher.finalize());
        self.root_dir.join(format!("{digest}.json"))
    }

    fn temp_path(&self, final_path: &Path) -> PathBuf {
        final_path.with_extension("json.tmp")
    }
}

#[async_trait]
impl Cache for FsCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.entry_path(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(CacheError::io(err.to_string())),
        };
        let stored: StoredEntry =
            serde_json::from_slice(&bytes).map_err(|err| CacheError::decode(err.to_string()))?;
        if stored.schema_version != CACHE_SCHEMA_VERSION {
            return Ok(None);
        }
        Ok(Some(CacheEntry {
            payload: stored.payload,
            stored_at_unix_secs: stored.stored_at_unix_secs,
            content_fingerprint: stored.content_fingerprint,
        }))
    }

    async fn put(
        &self,
        key: &CacheKey,
        payload: Vec<u8>,
        content_fingerprint: String,
    ) -> Result<(), CacheError> {
        fs::create_dir_all(&self.root_dir).await.map_err(|err| CacheError::io(err.to_string()))?;
        let path = self.entry_path(key);
        let temp_path = self.temp_path(&path);

        let stored_at_unix_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let entry = StoredEntry {
            stored_at_unix_secs,
            content_fingerprint,
            payload,
            schema_version: CACHE_SCHEMA_VERSION,
        };
        let bytes =
            serde_json::to_vec(&entry).map_err(|err| CacheError::decode(err.to_string()))?;

        fs::write(&temp_path, &bytes).await.map_err(|err| CacheError::io(err.to_string()))?;
        fs::rename(&temp_path, &path).await.map_err(|err| CacheError::io(err.to_string()))?;
        Ok(())
    }

    async fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CacheError::io(err.to_string())),
        }
    }
}
