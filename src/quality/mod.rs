//! Data quality
//!
//! SLA staleness checks, per-sleeve coverage/freshness scoring, and the
//! per-symbol staleness report.

mod aggregator;
mod report;
mod staleness;

pub use aggregator::{QualityAggregator, QualityAssessment, QualityScore};
pub use report::{DataQualityReport, SymbolQuality};
pub use staleness::{
    parse_as_of, staleness_threshold, StalenessEvaluator, DEFAULT_SLA_SLACK_FACTOR,
    DEFAULT_STALENESS_DAYS,
};
