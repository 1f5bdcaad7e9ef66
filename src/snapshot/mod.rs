//! Feature snapshots
//!
//! Joins the registry with fetched observations and staleness into
//! per-feature rows carrying quality-adjusted weights.

mod builder;

pub use builder::{quality_factor, FeatureSnapshotBuilder, FALLBACK_FACTOR, STALE_FACTOR};

use crate::registry::Sleeve;
use crate::source::ObservationSource;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One feature joined with its latest observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub feature_id: String,
    pub symbol: String,
    pub sleeve: Sleeve,
    pub label: String,
    pub value: Option<Decimal>,
    pub as_of: Option<String>,
    pub source: ObservationSource,
    pub stale: bool,
    pub fallback: bool,
    pub weight_base: Decimal,
    /// `weight_base` scaled by the observation quality factor
    pub effective_weight: Decimal,
}

impl FeatureSnapshot {
    pub fn is_healthy(&self) -> bool {
        !self.stale && !self.fallback
    }
}
