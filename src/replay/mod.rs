//! Deterministic replay
//!
//! Point-in-time snapshot rows over a historical window, a determinism check
//! that builds twice and compares, and an append-only NDJSON artifact.

mod builder;
mod writer;

pub use builder::{
    determinism_payload, payload_digest, DeterminismReport, ReplayBuild, ReplaySnapshotBuilder,
};
pub use writer::{ReplayMeta, ReplaySummary, ReplayWriter};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One historical value keyed by `symbol:as_of`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayRow {
    pub key: String,
    pub symbol: String,
    pub as_of: String,
    pub value: Decimal,
    pub source: String,
}

impl ReplayRow {
    pub fn new(symbol: &str, as_of: &str, value: Decimal, source: &str) -> Self {
        Self {
            key: format!("{}:{}", symbol, as_of),
            symbol: symbol.to_string(),
            as_of: as_of.to_string(),
            value,
            source: source.to_string(),
        }
    }
}

/// Replay job errors
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Two builds over identical inputs disagreed
    #[error("Replay is not deterministic: first build {first}, second build {second}")]
    DeterminismViolation { first: String, second: String },
    /// Artifact I/O failure
    #[error("Replay artifact I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Artifact serialization failure
    #[error("Replay serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
