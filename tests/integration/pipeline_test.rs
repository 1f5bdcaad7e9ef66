//! Integration tests for the signal pipeline over fixture providers

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use regime_signals::clock::{Clock, FixedClock};
use regime_signals::config::Config;
use regime_signals::drift::DriftState;
use regime_signals::engine::RegimeEngine;
use regime_signals::regime::{Confidence, RegimeLabel};
use regime_signals::registry::{FeatureRegistry, ProviderKind};
use regime_signals::source::{
    BatchObservations, MemoryCache, MetricSource, MockTable, Provider, ProviderReading,
    ResilientSource, RetryPolicy, SourceError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Serves fixed readings; symbols without one fail with a 503
struct FixtureProvider {
    name: &'static str,
    readings: HashMap<String, ProviderReading>,
    calls: AtomicU32,
}

impl FixtureProvider {
    fn new(name: &'static str, readings: &[(&str, Decimal, &str)]) -> Self {
        Self {
            name,
            readings: readings
                .iter()
                .map(|(symbol, value, as_of)| {
                    (
                        symbol.to_string(),
                        ProviderReading {
                            value: Some(*value),
                            as_of: Some(as_of.to_string()),
                            unit: "level".to_string(),
                        },
                    )
                })
                .collect(),
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Provider for FixtureProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, symbol: &str) -> Result<ProviderReading, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.readings
            .get(symbol)
            .cloned()
            .ok_or(SourceError::Status {
                provider: self.name,
                status: 503,
            })
    }
}

struct Fixture {
    engine: RegimeEngine,
    clock: Arc<FixedClock>,
    fred: Arc<FixtureProvider>,
}

fn fixture(fred_readings: &[(&str, Decimal, &str)], quotes: &[(&str, Decimal, &str)]) -> Fixture {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 8, 15, 0, 0).unwrap(),
    ));
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let registry = Arc::new(FeatureRegistry::builtin());
    let fred = Arc::new(FixtureProvider::new("fred", fred_readings));
    let quotes = Arc::new(FixtureProvider::new("alpha_vantage", quotes));

    let source = ResilientSource::new(
        &registry,
        MockTable::default(),
        Arc::new(MemoryCache::<BatchObservations>::new(dyn_clock.clone())),
        Duration::minutes(5),
        RetryPolicy::new(2, std::time::Duration::from_millis(1)),
        dyn_clock.clone(),
    )
    .with_provider(ProviderKind::Fred, fred.clone())
    .with_provider(ProviderKind::AlphaVantage, quotes);

    let engine = RegimeEngine::new(registry, Arc::new(source), &Config::default(), dyn_clock);
    Fixture {
        engine,
        clock,
        fred,
    }
}

fn strong_quotes() -> Vec<(&'static str, Decimal, &'static str)> {
    vec![
        ("SPY", dec!(2.4), "2024-03-08T14:30:00Z"),
        ("QQQ", dec!(2.8), "2024-03-08T14:30:00Z"),
        ("DIA", dec!(2.3), "2024-03-08T14:30:00Z"),
    ]
}

fn macro_series() -> Vec<(&'static str, Decimal, &'static str)> {
    vec![
        ("FEDFUNDS", dec!(5.33), "2024-03-01"),
        ("UNRATE", dec!(3.9), "2024-03-01"),
    ]
}

#[tokio::test]
async fn test_healthy_pipeline_end_to_end() {
    let f = fixture(&macro_series(), &strong_quotes());

    let regime = f.engine.regime().await;
    assert!(!regime.is_degraded());
    let state = regime.value().unwrap();
    assert_eq!(state.score, 60);
    assert_eq!(state.state, RegimeLabel::RiskOn);
    assert_eq!(state.confidence, Confidence::High);
    assert_eq!(state.quality.sources, vec!["alpha_vantage", "fred"]);

    let drift = f.engine.drift().await;
    let drift = drift.value().unwrap();
    assert_eq!(drift.state, DriftState::Green);
    assert_eq!(drift.confidence_cap, Confidence::High);

    let thesis = f.engine.thesis().await;
    let thesis = thesis.value().unwrap();
    let total: Decimal = thesis.items().map(|i| i.probability).sum();
    assert_eq!(total, dec!(100));
    assert_eq!(thesis.base.id, "risk_on_continuation");
    assert!(thesis
        .alternatives
        .iter()
        .all(|a| a.probability <= thesis.base.probability));
}

#[tokio::test]
async fn test_upstream_outage_degrades_to_fallback() {
    let f = fixture(&[("FEDFUNDS", dec!(5.33), "2024-03-01")], &strong_quotes());

    let regime = f.engine.regime().await;
    let error = regime.error().unwrap();
    assert!(error.contains("UNRATE: fred returned status 503"));

    let state = regime.value().unwrap();
    assert!(state.quality.fallback_used);
    assert_eq!(state.confidence, Confidence::Low);

    let drift = f.engine.drift().await;
    assert_eq!(drift.error(), Some(error));
    let drift = drift.value().unwrap();
    assert_eq!(drift.state, DriftState::Red);
    assert_eq!(drift.confidence_cap, Confidence::Low);
    assert_eq!(drift.error.as_deref(), Some(error));

    let thesis = f.engine.thesis().await;
    assert_eq!(thesis.value().unwrap().confidence, Confidence::Low);
}

#[tokio::test]
async fn test_retry_budget_is_per_call() {
    let f = fixture(&[], &strong_quotes());
    f.engine.regime().await;
    // Two macro symbols, two attempts each
    assert_eq!(f.fred.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_batches_are_cached_until_ttl() {
    let f = fixture(&macro_series(), &strong_quotes());

    f.engine.regime().await;
    f.engine.regime().await;
    assert_eq!(f.fred.calls.load(Ordering::SeqCst), 2);

    f.clock.advance(Duration::minutes(6));
    f.engine.regime().await;
    assert_eq!(f.fred.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_date_only_quotes_are_fresh_on_trading_day() {
    let quotes = vec![
        ("SPY", dec!(2.4), "2024-03-08"),
        ("QQQ", dec!(2.8), "2024-03-08"),
        ("DIA", dec!(2.3), "2024-03-08"),
    ];
    let f = fixture(&macro_series(), &quotes);

    let regime = f.engine.regime().await;
    assert!(regime.error().is_none());
    let state = regime.value().unwrap();
    assert_eq!(state.quality.stale_count, 0);
    assert_eq!(state.confidence, Confidence::High);

    let drift = f.engine.drift().await;
    let drift = drift.value().unwrap();
    assert_eq!(drift.state, DriftState::Green);
    assert_eq!(drift.confidence_cap, Confidence::High);

    // Late the next evening the prior trading day is still within slack
    f.clock.advance(Duration::hours(30));
    let regime = f.engine.regime().await;
    assert_eq!(regime.value().unwrap().quality.stale_count, 0);
}

#[tokio::test]
async fn test_stale_quotes_lower_confidence() {
    let f = fixture(&macro_series(), &strong_quotes());
    // Daily quote SLA with a 2x slack
    f.clock.advance(Duration::days(3));

    let regime = f.engine.regime().await;
    let state = regime.value().unwrap();
    assert_eq!(state.quality.stale_count, 3);
    assert_eq!(state.confidence, Confidence::Low);

    let drift = f.engine.drift().await;
    let drift = drift.value().unwrap();
    assert_eq!(drift.stale_ratio, dec!(1));
    assert_eq!(drift.state, DriftState::Red);
}

#[tokio::test]
async fn test_signals_weights_follow_quality() {
    let f = fixture(
        &[
            ("DGS10", dec!(4.2), "2024-03-07"),
            ("UNRATE", dec!(3.9), "2023-12-08"),
        ],
        &strong_quotes(),
    );

    let signals = f.engine.signals().await;
    assert!(signals.is_degraded());
    let view = signals.value().unwrap();
    assert_eq!(view.snapshots.len(), FeatureRegistry::builtin().len());

    for snapshot in &view.snapshots {
        assert!(snapshot.effective_weight >= Decimal::ZERO);
        assert!(snapshot.effective_weight <= snapshot.weight_base);
        assert_eq!(
            snapshot.effective_weight == snapshot.weight_base,
            !snapshot.stale && !snapshot.fallback
        );
    }

    let dgs10 = view.snapshots.iter().find(|s| s.symbol == "DGS10").unwrap();
    assert!(!dgs10.stale && !dgs10.fallback);

    let unrate = view.snapshots.iter().find(|s| s.symbol == "UNRATE").unwrap();
    assert!(unrate.stale);
    assert!(!unrate.fallback);
    assert_eq!(unrate.effective_weight, unrate.weight_base * dec!(0.7));

    let dgs2 = view.snapshots.iter().find(|s| s.symbol == "DGS2").unwrap();
    assert!(dgs2.fallback);
    assert_eq!(dgs2.effective_weight, dgs2.weight_base * dec!(0.4));

    let sleeve_mean: u32 = view.quality.sleeves.iter().map(|s| s.quality).sum::<u32>()
        / view.quality.sleeves.len() as u32;
    assert!(view.quality.overall_quality.abs_diff(sleeve_mean) <= 1);
}

#[tokio::test]
async fn test_quality_report_flags_fallbacks() {
    let f = fixture(&macro_series(), &strong_quotes());
    let report = f.engine.quality_report().await;
    let report = report.value().unwrap();

    let unrate = report.symbols.iter().find(|s| s.symbol == "UNRATE").unwrap();
    assert!(!unrate.stale);
    assert!(!unrate.fallback);
    assert_eq!(unrate.threshold_days, 45);

    let dgs10 = report.symbols.iter().find(|s| s.symbol == "DGS10").unwrap();
    assert!(dgs10.fallback);
    assert!(report.fallback_count > 0);
}

#[tokio::test]
async fn test_source_never_fails_for_unknown_symbol() {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(Utc::now()));
    let source = ResilientSource::new(
        &FeatureRegistry::builtin(),
        MockTable::empty(),
        Arc::new(MemoryCache::<BatchObservations>::new(clock.clone())),
        Duration::minutes(5),
        RetryPolicy::default(),
        clock,
    );
    let obs = source.fetch("NOT_A_SERIES").await;
    assert!(obs.value.is_none());
    assert!(obs.as_of.is_none());
    assert!(obs.quality_flags.missing);
    assert!(obs.quality_flags.fallback);
}
