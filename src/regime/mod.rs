//! Market regime
//!
//! Scores risk appetite from equity momentum plus fed funds and
//! unemployment levels, with a small fixed driver list for explainability.

mod scorer;
mod types;

pub use scorer::{RegimeConfig, RegimeScorer};
pub use types::{
    Confidence, DriverDirection, DriverImpact, QualityBadge, RegimeDriver, RegimeInput,
    RegimeInputs, RegimeLabel, RegimeState, RISK_OFF_THRESHOLD, RISK_ON_THRESHOLD,
};
