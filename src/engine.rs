//! Regime engine
//!
//! Wires the registry, metric source and every aggregation stage together.
//! Each entry point hands back an [`Outcome`]: upstream trouble shows up as
//! an advisory error next to still-usable data.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::drift::{DriftAssessment, DriftMonitor};
use crate::outcome::{merge_errors, Outcome};
use crate::quality::{DataQualityReport, QualityAggregator, QualityAssessment, StalenessEvaluator};
use crate::regime::{Confidence, QualityBadge, RegimeInput, RegimeInputs, RegimeScorer, RegimeState};
use crate::registry::{FeatureRegistry, ProviderKind};
use crate::snapshot::{FeatureSnapshot, FeatureSnapshotBuilder};
use crate::source::{
    AlphaVantageClient, BatchObservations, CoinGeckoClient, FredClient, MemoryCache, MetricSource,
    MockTable, RawObservation, ResilientSource, SourceError,
};
use crate::telemetry::{self, GaugeMetric};
use crate::thesis::{default_invalidations, ThesisHistory, ThesisSnapshot, ThesisSynthesizer};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Equity quotes whose daily change drives the score
pub const EQUITY_SYMBOLS: [&str; 3] = ["SPY", "QQQ", "DIA"];
pub const FED_FUNDS_SYMBOL: &str = "FEDFUNDS";
pub const UNEMPLOYMENT_SYMBOL: &str = "UNRATE";

/// SLA used for regime inputs missing from the registry
const DEFAULT_SLA_MINUTES: i64 = 1440;

/// Feature snapshots with their quality roll-up
#[derive(Debug, Clone, Serialize)]
pub struct SignalsView {
    pub as_of: DateTime<Utc>,
    pub snapshots: Vec<FeatureSnapshot>,
    pub quality: QualityAssessment,
}

/// Entry point for every aggregation stage
pub struct RegimeEngine {
    registry: Arc<FeatureRegistry>,
    source: Arc<dyn MetricSource>,
    staleness: StalenessEvaluator,
    snapshots: FeatureSnapshotBuilder,
    aggregator: QualityAggregator,
    scorer: RegimeScorer,
    drift: DriftMonitor,
    thesis: ThesisSynthesizer,
    clock: Arc<dyn Clock>,
}

impl RegimeEngine {
    pub fn new(
        registry: Arc<FeatureRegistry>,
        source: Arc<dyn MetricSource>,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let staleness =
            StalenessEvaluator::with_slack(clock.clone(), config.staleness.sla_slack_factor);
        Self {
            registry,
            source,
            snapshots: FeatureSnapshotBuilder::new(staleness.clone()),
            staleness,
            aggregator: QualityAggregator::new(Duration::days(
                config.staleness.freshness_window_days,
            )),
            scorer: RegimeScorer::new(config.regime.clone()),
            drift: DriftMonitor::new(),
            thesis: ThesisSynthesizer::with_own_history(config.thesis.clone(), clock.clone()),
            clock,
        }
    }

    /// Engine backed by live FRED, Alpha Vantage and CoinGecko clients
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let registry = Arc::new(FeatureRegistry::builtin());

        let source = ResilientSource::new(
            &registry,
            MockTable::default(),
            Arc::new(MemoryCache::<BatchObservations>::new(clock.clone())),
            config.source.cache_ttl(),
            config.source.retry_policy(),
            clock.clone(),
        )
        .with_provider(
            ProviderKind::Fred,
            Arc::new(FredClient::with_config(config.source.fred())?),
        )
        .with_provider(
            ProviderKind::AlphaVantage,
            Arc::new(AlphaVantageClient::with_config(config.source.alpha_vantage())?),
        )
        .with_provider(
            ProviderKind::CoinGecko,
            Arc::new(CoinGeckoClient::with_config(config.source.coingecko())?),
        );

        Ok(Self::new(registry, Arc::new(source), config, clock))
    }

    /// Record theses into a history owned by the caller
    pub fn with_thesis_history(mut self, history: Arc<RwLock<ThesisHistory>>) -> Self {
        self.thesis = self.thesis.with_history(history);
        self
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    /// Snapshot every registry feature and roll quality up by sleeve
    pub async fn signals(&self) -> Outcome<SignalsView> {
        let batch = self.source.fetch_batch(&self.registry.symbols()).await;
        let now = self.clock.now();

        let snapshots = self.snapshots.build(&self.registry, &batch.observations);
        let quality = self.aggregator.assess(&self.registry, &batch.observations, now);

        tracing::info!(
            features = snapshots.len(),
            overall_quality = quality.overall_quality,
            errors = batch.errors.len(),
            "Built signal snapshots"
        );

        Outcome::from_parts(
            SignalsView {
                as_of: now,
                snapshots,
                quality,
            },
            &batch.errors,
        )
    }

    /// Score the regime from equity and macro branches fetched concurrently
    pub async fn regime(&self) -> Outcome<RegimeState> {
        let equities: Vec<String> = EQUITY_SYMBOLS.iter().map(|s| s.to_string()).collect();
        let macros = vec![FED_FUNDS_SYMBOL.to_string(), UNEMPLOYMENT_SYMBOL.to_string()];

        let (equity_batch, macro_batch) = tokio::join!(
            self.source.fetch_batch(&equities),
            self.source.fetch_batch(&macros)
        );

        let inputs = RegimeInputs {
            spx_change: self.input(&equity_batch, EQUITY_SYMBOLS[0]),
            nasdaq_change: self.input(&equity_batch, EQUITY_SYMBOLS[1]),
            dow_change: self.input(&equity_batch, EQUITY_SYMBOLS[2]),
            fed_funds: self.input(&macro_batch, FED_FUNDS_SYMBOL),
            unemployment: self.input(&macro_batch, UNEMPLOYMENT_SYMBOL),
        };

        let mut errors = equity_batch.errors;
        errors.extend(macro_batch.errors);

        let has_value = inputs.equity_changes().len()
            + [&inputs.fed_funds, &inputs.unemployment]
                .iter()
                .filter(|i| i.value.is_some())
                .count()
            > 0;
        if !has_value {
            let error = merge_errors(errors.as_slice())
                .unwrap_or_else(|| "no regime inputs available".to_string());
            tracing::error!(error = %error, "Regime scoring failed");
            return Outcome::Failed(error);
        }

        let state = self.scorer.score(&inputs);
        telemetry::set_gauge(GaugeMetric::RegimeScore, f64::from(state.score));
        tracing::info!(
            score = state.score,
            state = ?state.state,
            confidence = ?state.confidence,
            "Regime scored"
        );

        Outcome::from_parts(state, &errors)
    }

    /// Drift for the current regime; never fails
    pub async fn drift(&self) -> Outcome<DriftAssessment> {
        let regime = self.regime().await;
        self.drift_for(&regime)
    }

    /// Thesis for the current regime, recorded in history
    pub async fn thesis(&self) -> Outcome<ThesisSnapshot> {
        let regime = self.regime().await;
        let drift = self.drift_for(&regime);

        let state = match regime.value() {
            Some(state) => state,
            None => {
                return Outcome::Failed(regime.error().unwrap_or("regime unavailable").to_string())
            }
        };
        let cap = drift
            .value()
            .map(|d| d.confidence_cap)
            .unwrap_or(Confidence::Low);

        let snapshot = self
            .thesis
            .build(state, cap, default_invalidations(state))
            .await;

        let errors: Vec<String> = regime.error().map(str::to_string).into_iter().collect();
        Outcome::from_parts(snapshot, &errors)
    }

    /// Recorded theses, newest first
    pub async fn thesis_history(&self) -> Vec<ThesisSnapshot> {
        self.thesis.history().await
    }

    /// Per-symbol staleness against the fixed threshold table
    pub async fn quality_report(&self) -> Outcome<DataQualityReport> {
        let batch = self.source.fetch_batch(&self.registry.symbols()).await;
        let report = DataQualityReport::build(&batch.observations, self.clock.now());
        Outcome::from_parts(report, &batch.errors)
    }

    fn input(&self, batch: &BatchObservations, symbol: &str) -> RegimeInput {
        let sla = self
            .registry
            .get(symbol)
            .map(|s| s.sla_minutes)
            .unwrap_or(DEFAULT_SLA_MINUTES);
        match batch.get(symbol) {
            Some(obs) => {
                let stale = self.staleness.is_stale(obs.as_of.as_deref(), sla);
                RegimeInput::from_observation(obs, stale)
            }
            None => RegimeInput::from_observation(&RawObservation::missing(symbol), true),
        }
    }

    fn drift_for(&self, regime: &Outcome<RegimeState>) -> Outcome<DriftAssessment> {
        // A failed regime has no badge; treat it as fully degraded
        let badge = match regime.value() {
            Some(state) => state.quality.clone(),
            None => QualityBadge {
                fallback_used: true,
                ..Default::default()
            },
        };
        let error = regime.error().map(str::to_string);
        let assessment = self.drift.assess(&badge, error.clone(), self.clock.now());
        telemetry::set_gauge(
            GaugeMetric::DriftStaleRatio,
            assessment.stale_ratio.to_f64().unwrap_or(0.0),
        );

        match error {
            Some(error) => Outcome::Degraded {
                value: assessment,
                error,
            },
            None => Outcome::Ok(assessment),
        }
    }
}
