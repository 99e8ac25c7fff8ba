//! Throttled logging helper (spec §5 "Shared resources").
//!
//! Grounded in `original_source/.../utils.py`'s `SemanticLogger`: WARN and
//! INFO messages keyed by a caller-supplied string are suppressed for 30
//! seconds after the first emission of that key; ERROR messages are never
//! throttled.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Minimum interval between repeated log emissions for the same key.
pub const THROTTLE_WINDOW: Duration = Duration::from_secs(30);

/// Per-key log throttle, shared across the engine via `Arc<Throttle>`.
pub struct Throttle {
    last_emitted: Mutex<HashMap<String, Instant>>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new()
    }
}

impl Throttle {
    #[must_use]
    pub fn new() -> Self {
        Self { last_emitted: Mutex::new(HashMap::new()) }
    }

    /// Returns `true` if a message under `key` should be emitted now,
    /// recording the emission so subsequent calls within
    /// [`THROTTLE_WINDOW`] return `false`.
    #[must_use]
    pub fn should_log(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut guard = self.last_emitted.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match guard.get(key) {
            Some(last) if now.duration_since(*last) < THROTTLE_WINDOW => false,
            _ => {
                guard.insert(key.to_string(), now);
                true
            }
        }
    }

    /// Logs at WARN level through the throttle.
    pub fn warn(&self, key: &str, message: &str) {
        if self.should_log(key) {
            tracing::warn!(key, "{message}");
        }
    }

    /// Logs at INFO level through the throttle.
    pub fn info(&self, key: &str, message: &str) {
        if self.should_log(key) {
            tracing::info!(key, "{message}");
        }
    }

    /// Logs at ERROR level, bypassing the throttle entirely.
    pub fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_for_a_key_always_logs() {
        let throttle = Throttle::new();
        assert!(throttle.should_log("provider:overpass"));
    }

    #[test]
    fn repeated_calls_within_window_are_suppressed() {
        let throttle = Throttle::new();
        assert!(throttle.should_log("provider:overpass"));
        assert!(!throttle.should_log("provider:overpass"));
    }

    #[test]
    fn distinct_keys_do_not_interfere() {
        let throttle = Throttle::new();
        assert!(throttle.should_log("a"));
        assert!(throttle.should_log("b"));
    }
}
