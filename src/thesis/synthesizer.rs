//! Thesis construction and probability normalization

use super::{ThesisHistory, ThesisItem, ThesisSnapshot, DEFAULT_HISTORY_LIMIT};
use crate::clock::Clock;
use crate::regime::{Confidence, RegimeLabel, RegimeState};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Thesis construction parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThesisConfig {
    /// Raw weight of the range-bound alternative before normalization
    pub alternative_probability: Decimal,
    /// Snapshots retained in history
    pub history_limit: usize,
}

impl Default for ThesisConfig {
    fn default() -> Self {
        Self {
            alternative_probability: dec!(30),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Builds thesis snapshots and records them in an injected history
pub struct ThesisSynthesizer {
    config: ThesisConfig,
    history: Arc<RwLock<ThesisHistory>>,
    clock: Arc<dyn Clock>,
}

impl ThesisSynthesizer {
    pub fn new(
        config: ThesisConfig,
        history: Arc<RwLock<ThesisHistory>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            history,
            clock,
        }
    }

    /// Synthesizer with a private history sized from the config
    pub fn with_own_history(config: ThesisConfig, clock: Arc<dyn Clock>) -> Self {
        let history = Arc::new(RwLock::new(ThesisHistory::new(config.history_limit)));
        Self::new(config, history, clock)
    }

    /// Swap in a history shared with other owners
    pub fn with_history(mut self, history: Arc<RwLock<ThesisHistory>>) -> Self {
        self.history = history;
        self
    }

    /// Build a snapshot and record it at the front of the history
    pub async fn build(
        &self,
        regime: &RegimeState,
        drift_cap: Confidence,
        invalidations: Vec<String>,
    ) -> ThesisSnapshot {
        let snapshot = self.synthesize(regime, drift_cap, invalidations);
        self.history.write().await.push(snapshot.clone());
        tracing::info!(
            base = %snapshot.base.id,
            probability = %snapshot.base.probability,
            confidence = ?snapshot.confidence,
            "Thesis updated"
        );
        snapshot
    }

    /// Build a snapshot without touching the history
    pub fn synthesize(
        &self,
        regime: &RegimeState,
        drift_cap: Confidence,
        invalidations: Vec<String>,
    ) -> ThesisSnapshot {
        let score = Decimal::from(regime.score);
        let raw = [
            score,
            dec!(100) - score,
            self.config.alternative_probability.max(Decimal::ZERO),
        ];
        let probabilities = normalize(&raw);

        let mut items = vec![
            base_item(regime.state, probabilities[0], invalidations),
            reversal_item(regime.state, probabilities[1]),
            range_item(probabilities[2]),
        ];
        items.sort_by(|a, b| b.probability.cmp(&a.probability));

        let base = items.remove(0);

        ThesisSnapshot {
            id: Uuid::new_v4(),
            as_of: self.clock.now(),
            regime: regime.state,
            score: regime.score,
            base,
            alternatives: items,
            confidence: regime.confidence.capped_at(drift_cap),
        }
    }

    /// Recorded snapshots, newest first
    pub async fn history(&self) -> Vec<ThesisSnapshot> {
        self.history.read().await.list()
    }

    pub async fn latest(&self) -> Option<ThesisSnapshot> {
        self.history.read().await.latest().cloned()
    }
}

/// Scale to a total of 100 with one decimal place; the rounding residue goes
/// to the largest entry so the sum is exact
fn normalize(raw: &[Decimal]) -> Vec<Decimal> {
    let total: Decimal = raw.iter().copied().sum();
    if total <= Decimal::ZERO {
        let even = (dec!(100) / Decimal::from(raw.len().max(1)))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        return raw.iter().map(|_| even).collect();
    }

    let mut scaled: Vec<Decimal> = raw
        .iter()
        .map(|v| {
            (v * dec!(100) / total).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        })
        .collect();

    // Among tied leaders, a positive residue goes to the first and a negative
    // one to the last so the earlier item keeps its rank
    let residue = dec!(100) - scaled.iter().copied().sum::<Decimal>();
    if !residue.is_zero() {
        let leader = scaled.iter().copied().max().unwrap_or(Decimal::ZERO);
        let mut tied = scaled
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == leader)
            .map(|(i, _)| i);
        let idx = if residue > Decimal::ZERO {
            tied.next()
        } else {
            tied.last()
        };
        if let Some(idx) = idx {
            scaled[idx] += residue;
        }
    }
    scaled
}

fn base_item(state: RegimeLabel, probability: Decimal, invalidations: Vec<String>) -> ThesisItem {
    let (id, name, narrative) = match state {
        RegimeLabel::RiskOn => (
            "risk_on_continuation",
            "Risk-on continuation",
            "Equity momentum and contained macro pressure keep risk appetite supported.",
        ),
        RegimeLabel::RiskOff => (
            "risk_off_deterioration",
            "Risk-off deterioration",
            "Falling equities and tight policy or softening labor keep pressure on risk assets.",
        ),
        RegimeLabel::Neutral => (
            "balanced_regime",
            "Balanced regime",
            "Mixed equity and macro signals leave risk appetite without a clear direction.",
        ),
    };
    ThesisItem {
        id: id.to_string(),
        name: name.to_string(),
        narrative: narrative.to_string(),
        probability,
        horizon: "2-6 weeks".to_string(),
        invalidations,
    }
}

fn reversal_item(state: RegimeLabel, probability: Decimal) -> ThesisItem {
    let narrative = match state {
        RegimeLabel::RiskOn => "Momentum fades as macro headwinds reassert and risk appetite rolls over.",
        RegimeLabel::RiskOff => "Selling exhausts and easing conditions pull risk appetite back up.",
        RegimeLabel::Neutral => "A decisive break in equities or policy resolves the standoff.",
    };
    ThesisItem {
        id: "regime_reversal".to_string(),
        name: "Regime reversal".to_string(),
        narrative: narrative.to_string(),
        probability,
        horizon: "1-3 months".to_string(),
        invalidations: vec![
            "Regime score moves further in the current direction".to_string(),
        ],
    }
}

fn range_item(probability: Decimal) -> ThesisItem {
    ThesisItem {
        id: "range_bound".to_string(),
        name: "Range-bound consolidation".to_string(),
        narrative: "Markets chop sideways while data flow stays mixed.".to_string(),
        probability,
        horizon: "2-4 weeks".to_string(),
        invalidations: vec!["Regime score leaves the 40-60 band for a full week".to_string()],
    }
}

/// Conditions that would invalidate the base thesis for a regime
pub fn default_invalidations(regime: &RegimeState) -> Vec<String> {
    match regime.state {
        RegimeLabel::RiskOn => vec![
            "S&P 500 daily change below -1.5%".to_string(),
            "Unemployment rate rises above 4.5%".to_string(),
        ],
        RegimeLabel::RiskOff => vec![
            "S&P 500 daily change above +1.5%".to_string(),
            "Fed funds rate falls below 5%".to_string(),
        ],
        RegimeLabel::Neutral => vec![
            "Regime score breaks above 60".to_string(),
            "Regime score breaks below 40".to_string(),
        ],
    }
}
