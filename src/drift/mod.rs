//! Drift monitor
//!
//! Measures how much data-quality degradation undermines the regime call and
//! turns it into a traffic-light state plus a confidence cap.

use crate::regime::{Confidence, QualityBadge};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Stale ratio at which drift turns red
pub const RED_STALE_RATIO: Decimal = dec!(0.4);
/// Stale ratio at which drift turns yellow
pub const YELLOW_STALE_RATIO: Decimal = dec!(0.2);

/// Traffic-light drift state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftState {
    Green,
    Yellow,
    Red,
}

/// Drift verdict for one regime evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftAssessment {
    pub as_of: DateTime<Utc>,
    pub state: DriftState,
    pub confidence_cap: Confidence,
    /// Stale inputs over `max(1, source count)`, bounded to [0, 1]
    pub stale_ratio: Decimal,
    pub stale_count: usize,
    pub fallback_used: bool,
    /// Upstream error carried through from the regime evaluation
    pub error: Option<String>,
}

/// Derives drift from a regime quality badge
#[derive(Debug, Clone, Default)]
pub struct DriftMonitor;

impl DriftMonitor {
    pub fn new() -> Self {
        Self
    }

    /// Always produces an assessment; an upstream error is passed through
    pub fn assess(
        &self,
        quality: &QualityBadge,
        upstream_error: Option<String>,
        now: DateTime<Utc>,
    ) -> DriftAssessment {
        let total_signals = quality.sources.len().max(1);
        let stale_ratio = (Decimal::from(quality.stale_count) / Decimal::from(total_signals))
            .clamp(Decimal::ZERO, Decimal::ONE)
            .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
        let stale_used = quality.stale_used || quality.stale_count > 0;

        let (state, confidence_cap) = if quality.fallback_used || stale_ratio >= RED_STALE_RATIO {
            (DriftState::Red, Confidence::Low)
        } else if stale_ratio >= YELLOW_STALE_RATIO || stale_used {
            (DriftState::Yellow, Confidence::Medium)
        } else {
            (DriftState::Green, Confidence::High)
        };

        if state != DriftState::Green {
            tracing::info!(
                ?state,
                stale_ratio = %stale_ratio,
                fallback_used = quality.fallback_used,
                "Regime drift detected"
            );
        }

        DriftAssessment {
            as_of: now,
            state,
            confidence_cap,
            stale_ratio,
            stale_count: quality.stale_count,
            fallback_used: quality.fallback_used,
            error: upstream_error,
        }
    }
}
