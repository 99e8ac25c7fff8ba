//! Semantic point-of-interest aggregation engine for arbitrary geographic
//! zones: provider fan-out, polygon filtering, validation, deduplication,
//! municipality discovery, a marine/wreck sub-pipeline, ranking, and
//! filesystem caching.

pub mod config;
pub mod domain;
pub mod logging;
pub mod outbound;

pub use config::EngineConfig;
pub use domain::error::{Error, ErrorCode};
pub use domain::orchestrator::Engine;
