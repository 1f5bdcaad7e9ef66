//! Regime scoring from equity momentum and macro levels

use super::types::{
    Confidence, DriverDirection, DriverImpact, RegimeDriver, RegimeInputs, RegimeLabel,
    RegimeState,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Scoring constants
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Neutral starting score
    pub base_score: Decimal,
    /// Points per percent of average equity change
    pub equity_multiplier: Decimal,
    /// Bound on the equity contribution in either direction
    pub equity_cap: Decimal,
    pub unemployment_threshold: Decimal,
    pub unemployment_penalty: Decimal,
    pub fed_funds_threshold: Decimal,
    pub fed_funds_penalty: Decimal,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            base_score: dec!(50),
            equity_multiplier: dec!(6),
            equity_cap: dec!(15),
            unemployment_threshold: dec!(4.5),
            unemployment_penalty: dec!(8),
            fed_funds_threshold: dec!(5),
            fed_funds_penalty: dec!(5),
        }
    }
}

/// Derives a 0-100 risk score, label and confidence
#[derive(Debug, Clone, Default)]
pub struct RegimeScorer {
    config: RegimeConfig,
}

impl RegimeScorer {
    pub fn new(config: RegimeConfig) -> Self {
        Self { config }
    }

    /// Mean of the available equity daily changes, zero when none
    pub fn average_equity_change(inputs: &RegimeInputs) -> Decimal {
        let changes = inputs.equity_changes();
        if changes.is_empty() {
            return Decimal::ZERO;
        }
        changes.iter().copied().sum::<Decimal>() / Decimal::from(changes.len())
    }

    pub fn score(&self, inputs: &RegimeInputs) -> RegimeState {
        let cfg = &self.config;
        let avg = Self::average_equity_change(inputs);

        let mut raw = cfg.base_score
            + (avg * cfg.equity_multiplier).clamp(-cfg.equity_cap, cfg.equity_cap);
        if inputs
            .unemployment
            .value
            .is_some_and(|u| u > cfg.unemployment_threshold)
        {
            raw -= cfg.unemployment_penalty;
        }
        if inputs
            .fed_funds
            .value
            .is_some_and(|f| f > cfg.fed_funds_threshold)
        {
            raw -= cfg.fed_funds_penalty;
        }

        let score = raw
            .clamp(Decimal::ZERO, dec!(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0);

        let quality = inputs.quality();
        let confidence = if quality.fallback_used || quality.stale_used {
            Confidence::Low
        } else if quality.sources.len() >= 2 {
            Confidence::High
        } else {
            Confidence::Medium
        };

        let state = RegimeLabel::from_score(score);
        tracing::debug!(score, ?state, ?confidence, avg_equity_change = %avg, "Scored regime");

        RegimeState {
            state,
            score,
            confidence,
            drivers: self.drivers(inputs),
            quality,
        }
    }

    fn drivers(&self, inputs: &RegimeInputs) -> Vec<RegimeDriver> {
        let cfg = &self.config;

        let spx = inputs.spx_change.value;
        let (spx_direction, spx_impact) = match spx {
            Some(v) if v > Decimal::ZERO => (DriverDirection::Up, DriverImpact::Positive),
            Some(v) if v < Decimal::ZERO => (DriverDirection::Down, DriverImpact::Negative),
            _ => (DriverDirection::Flat, DriverImpact::Neutral),
        };

        vec![
            RegimeDriver {
                id: "spx_daily_change".to_string(),
                label: "S&P 500 daily change".to_string(),
                value: spx,
                direction: spx_direction,
                impact: spx_impact,
            },
            level_driver(
                "fed_funds",
                "Fed funds rate",
                inputs.fed_funds.value,
                cfg.fed_funds_threshold,
            ),
            level_driver(
                "unemployment",
                "Unemployment rate",
                inputs.unemployment.value,
                cfg.unemployment_threshold,
            ),
        ]
    }
}

/// A level above its threshold is a headwind
fn level_driver(id: &str, label: &str, value: Option<Decimal>, threshold: Decimal) -> RegimeDriver {
    let (direction, impact) = match value {
        Some(v) if v > threshold => (DriverDirection::Up, DriverImpact::Negative),
        Some(_) => (DriverDirection::Down, DriverImpact::Neutral),
        None => (DriverDirection::Flat, DriverImpact::Neutral),
    };
    RegimeDriver {
        id: id.to_string(),
        label: label.to_string(),
        value,
        direction,
        impact,
    }
}
