//! Staleness evaluation
//!
//! Two independent notions live here. [`StalenessEvaluator`] judges a
//! feature against its own SLA with a slack factor. The symbol threshold
//! table feeds the general data-quality report and ignores per-feature SLAs.

use crate::clock::Clock;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;

/// Default multiplier applied to a feature SLA before it counts as stale
pub const DEFAULT_SLA_SLACK_FACTOR: f64 = 2.0;

/// Threshold for symbols missing from the table
pub const DEFAULT_STALENESS_DAYS: i64 = 7;

/// Parse an ISO date or RFC 3339 timestamp
pub fn parse_as_of(as_of: &str) -> Option<DateTime<Utc>> {
    let trimmed = as_of.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Decides whether an observation has breached its SLA
#[derive(Clone)]
pub struct StalenessEvaluator {
    clock: Arc<dyn Clock>,
    slack_factor: f64,
}

impl StalenessEvaluator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_slack(clock, DEFAULT_SLA_SLACK_FACTOR)
    }

    pub fn with_slack(clock: Arc<dyn Clock>, slack_factor: f64) -> Self {
        Self {
            clock,
            slack_factor,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Age of an observation in minutes, if its date parses
    pub fn age_minutes(&self, as_of: Option<&str>) -> Option<f64> {
        let ts = parse_as_of(as_of?)?;
        Some((self.clock.now() - ts).num_seconds() as f64 / 60.0)
    }

    /// Stale when the date is absent or unparseable, or older than
    /// `sla_minutes * slack_factor`
    pub fn is_stale(&self, as_of: Option<&str>, sla_minutes: i64) -> bool {
        match self.age_minutes(as_of) {
            Some(age) => age > sla_minutes as f64 * self.slack_factor,
            None => true,
        }
    }
}

/// Fixed per-symbol staleness threshold for data-quality reporting
pub fn staleness_threshold(symbol: &str) -> Duration {
    let days = match symbol {
        // Market quotes
        "SPY" | "QQQ" | "DIA" | "bitcoin" | "ethereum" => 3,
        // Daily rates, fx, credit, vol and energy series
        "DGS2" | "DGS10" | "DGS30" | "T10Y2Y" | "DFII10" | "VIXCLS" | "OVXCLS" | "GVZCLS"
        | "BAMLH0A0HYM2" | "BAMLC0A0CM" | "BAMLH0A3HYC" | "DCOILWTICO" | "DCOILBRENTEU"
        | "DHHNGSP" => 4,
        "DTWEXBGS" | "DEXUSEU" | "DEXJPUS" | "DEXCHUS" => 10,
        // Weekly
        "ICSA" | "NFCI" => 10,
        // Monthly
        "FEDFUNDS" | "UNRATE" | "CPIAUCSL" | "PCEPILFE" | "PAYEMS" | "INDPRO" | "UMCSENT"
        | "PCOPPUSDM" => 45,
        // Quarterly
        "GDPC1" => 120,
        _ => DEFAULT_STALENESS_DAYS,
    };
    Duration::days(days)
}
