//! Thesis synthesis
//!
//! Turns a regime call and its drift cap into a base thesis plus two
//! alternatives with probabilities normalized to 100, and keeps a bounded
//! history of what was produced.

mod history;
mod synthesizer;

pub use history::{ThesisHistory, DEFAULT_HISTORY_LIMIT};
pub use synthesizer::{default_invalidations, ThesisConfig, ThesisSynthesizer};

use crate::regime::{Confidence, RegimeLabel};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One candidate narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThesisItem {
    pub id: String,
    pub name: String,
    pub narrative: String,
    /// Percent, one decimal place
    pub probability: Decimal,
    pub horizon: String,
    pub invalidations: Vec<String>,
}

/// Base thesis and ranked alternatives at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThesisSnapshot {
    pub id: Uuid,
    pub as_of: DateTime<Utc>,
    pub regime: RegimeLabel,
    pub score: u32,
    pub base: ThesisItem,
    pub alternatives: Vec<ThesisItem>,
    pub confidence: Confidence,
}

impl ThesisSnapshot {
    /// Base followed by alternatives
    pub fn items(&self) -> impl Iterator<Item = &ThesisItem> {
        std::iter::once(&self.base).chain(self.alternatives.iter())
    }
}
