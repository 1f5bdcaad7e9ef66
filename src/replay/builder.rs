//! Replay row construction and determinism verification

use super::{ReplayError, ReplayRow};
use crate::clock::Clock;
use crate::outcome::merge_errors;
use crate::source::{HistorySource, RetryPolicy};
use crate::telemetry::{self, GaugeMetric};
use chrono::{Duration, NaiveDate};
use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;

/// Rows for one replay invocation plus per-series fetch errors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayBuild {
    pub rows: Vec<ReplayRow>,
    pub errors: Vec<String>,
}

impl ReplayBuild {
    pub fn error(&self) -> Option<String> {
        merge_errors(self.errors.as_slice())
    }
}

/// Result of a passing determinism check
#[derive(Debug, Clone, PartialEq)]
pub struct DeterminismReport {
    pub rows: usize,
    pub digest: String,
}

/// Builds point-in-time replay rows from series histories
pub struct ReplaySnapshotBuilder {
    source: Arc<dyn HistorySource>,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl ReplaySnapshotBuilder {
    pub fn new(source: Arc<dyn HistorySource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            retry: RetryPolicy::default(),
            clock,
        }
    }

    /// Retry budget applied to each series fetch
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Oldest date kept in a `days` window; clamps instead of underflowing
    fn cutoff(&self, days: u32) -> NaiveDate {
        self.clock
            .now()
            .date_naive()
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Rows for every series within the last `days` days, first occurrence
    /// of each key kept, sorted by symbol then date
    pub async fn build(&self, days: u32, series_ids: &[String]) -> ReplayBuild {
        let cutoff = self.cutoff(days);
        let source_name = self.source.name();

        let histories = join_all(
            series_ids
                .iter()
                .map(|id| self.retry.run(id, || self.source.history(id))),
        )
        .await;

        let mut seen = HashSet::new();
        let mut build = ReplayBuild::default();
        for (series_id, history) in series_ids.iter().zip(histories) {
            let points = match history {
                Ok(points) => points,
                Err(e) => {
                    tracing::warn!(series_id = %series_id, error = %e, "Replay history fetch failed");
                    build.errors.push(format!("{}: {}", series_id, e));
                    continue;
                }
            };

            for point in points {
                let Some(date) = parse_date(&point.as_of) else {
                    continue;
                };
                if date < cutoff {
                    continue;
                }
                let Some(value) = point.value else {
                    continue;
                };
                let row = ReplayRow::new(series_id, &date.to_string(), value, source_name);
                if seen.insert(row.key.clone()) {
                    build.rows.push(row);
                }
            }
        }

        build
            .rows
            .sort_by(|a, b| a.symbol.cmp(&b.symbol).then_with(|| a.as_of.cmp(&b.as_of)));

        telemetry::set_gauge(GaugeMetric::ReplayRows, build.rows.len() as f64);
        tracing::info!(
            days,
            series = series_ids.len(),
            rows = build.rows.len(),
            errors = build.errors.len(),
            "Built replay snapshot"
        );
        build
    }

    /// Build twice and require identical serialized payloads
    pub async fn validate_determinism(
        &self,
        days: u32,
        series_ids: &[String],
    ) -> Result<DeterminismReport, ReplayError> {
        let first = self.build(days, series_ids).await;
        let second = self.build(days, series_ids).await;

        let first_payload = determinism_payload(&first.rows);
        let second_payload = determinism_payload(&second.rows);

        if first_payload != second_payload {
            let first = payload_digest(&first_payload);
            let second = payload_digest(&second_payload);
            tracing::error!(first = %first, second = %second, "Replay determinism check failed");
            return Err(ReplayError::DeterminismViolation { first, second });
        }

        Ok(DeterminismReport {
            rows: first.rows.len(),
            digest: payload_digest(&first_payload),
        })
    }
}

/// `key:value` per row joined with `|`
pub fn determinism_payload(rows: &[ReplayRow]) -> String {
    rows.iter()
        .map(|r| format!("{}:{}", r.key, r.value))
        .collect::<Vec<_>>()
        .join("|")
}

/// Hex blake3 digest of a determinism payload
pub fn payload_digest(payload: &str) -> String {
    blake3::hash(payload.as_bytes()).to_hex().to_string()
}

fn parse_date(as_of: &str) -> Option<NaiveDate> {
    let date = as_of.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
