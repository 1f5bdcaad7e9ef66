//! Integration tests for replay snapshots and artifacts

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use regime_signals::clock::{Clock, FixedClock};
use regime_signals::replay::{
    determinism_payload, ReplayError, ReplayMeta, ReplayRow, ReplaySnapshotBuilder, ReplayWriter,
};
use regime_signals::source::{HistoryPoint, HistorySource, SourceError};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct FixtureHistory {
    series: HashMap<String, Vec<HistoryPoint>>,
    /// Reverse point order on every other call
    flip: AtomicBool,
}

#[async_trait]
impl HistorySource for FixtureHistory {
    fn name(&self) -> &'static str {
        "fred"
    }

    async fn history(&self, series_id: &str) -> Result<Vec<HistoryPoint>, SourceError> {
        let mut points = self
            .series
            .get(series_id)
            .cloned()
            .ok_or_else(|| SourceError::NoData(series_id.to_string()))?;
        if self.flip.fetch_xor(true, Ordering::SeqCst) {
            points.reverse();
        }
        Ok(points)
    }
}

fn point(as_of: &str, value: rust_decimal::Decimal) -> HistoryPoint {
    HistoryPoint {
        as_of: as_of.to_string(),
        value: Some(value),
    }
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 8, 18, 0, 0).unwrap(),
    ))
}

fn builder() -> ReplaySnapshotBuilder {
    let series = HashMap::from([
        (
            "DGS10".to_string(),
            vec![
                point("2024-02-29", dec!(4.25)),
                point("2024-03-04", dec!(4.22)),
                point("2024-03-05", dec!(4.13)),
                point("2024-03-06", dec!(4.11)),
            ],
        ),
        (
            "VIXCLS".to_string(),
            vec![point("2024-03-04", dec!(14.33)), point("2024-03-05", dec!(14.46))],
        ),
    ]);
    ReplaySnapshotBuilder::new(
        Arc::new(FixtureHistory {
            series,
            flip: AtomicBool::new(false),
        }),
        clock(),
    )
}

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_seven_day_window_with_duplicate_fetches() {
    let series = ids(&["VIXCLS", "DGS10", "DGS10"]);
    let build = builder().build(7, &series).await;

    let keys: Vec<&str> = build.rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "DGS10:2024-03-04",
            "DGS10:2024-03-05",
            "DGS10:2024-03-06",
            "VIXCLS:2024-03-04",
            "VIXCLS:2024-03-05",
        ]
    );
    assert!(build.errors.is_empty());
}

#[tokio::test]
async fn test_builds_are_byte_identical() {
    let builder = builder();
    let series = ids(&["DGS10", "VIXCLS"]);

    let first = builder.build(30, &series).await;
    let second = builder.build(30, &series).await;

    let first_json = serde_json::to_string(&first.rows).unwrap();
    let second_json = serde_json::to_string(&second.rows).unwrap();
    assert_eq!(first_json, second_json);
    assert_eq!(determinism_payload(&first.rows), determinism_payload(&second.rows));

    let report = builder.validate_determinism(30, &series).await.unwrap();
    assert_eq!(report.rows, 6);
}

#[tokio::test]
async fn test_build_then_write_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let series = ids(&["DGS10", "MISSING"]);
    let clock = clock();

    let build = builder().build(30, &series).await;
    let meta = ReplayMeta::new(clock.now(), 30, &series, &build);
    let path = ReplayWriter::new(dir.path()).write(&meta, &build).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "replay_snapshot_20240308T180000Z.ndjson"
    );

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();

    let meta_line: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
    assert_eq!(meta_line["type"], "meta");
    assert_eq!(meta_line["summary"]["rows"], 4);
    assert_eq!(meta_line["summary"]["errors"].as_array().unwrap().len(), 1);

    let rows: Vec<ReplayRow> = lines.map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(rows, build.rows);

    let again = ReplayWriter::new(dir.path()).write(&meta, &build);
    assert!(matches!(again, Err(ReplayError::Io(_))));
}
