//! Regime types

use crate::source::RawObservation;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Score at or above which the regime is risk-on
pub const RISK_ON_THRESHOLD: u32 = 60;
/// Score at or below which the regime is risk-off
pub const RISK_OFF_THRESHOLD: u32 = 40;

/// Coarse risk-appetite label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimeLabel {
    RiskOn,
    Neutral,
    RiskOff,
}

impl RegimeLabel {
    pub fn from_score(score: u32) -> Self {
        if score >= RISK_ON_THRESHOLD {
            RegimeLabel::RiskOn
        } else if score <= RISK_OFF_THRESHOLD {
            RegimeLabel::RiskOff
        } else {
            RegimeLabel::Neutral
        }
    }
}

/// Confidence level, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Lower `self` to at most `cap`
    pub fn capped_at(self, cap: Confidence) -> Confidence {
        self.min(cap)
    }
}

/// Sign of a driver relative to zero or its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverDirection {
    Up,
    Down,
    Flat,
}

/// Effect of a driver on risk appetite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverImpact {
    Positive,
    Negative,
    Neutral,
}

/// Explainability entry for the regime score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeDriver {
    pub id: String,
    pub label: String,
    pub value: Option<Decimal>,
    pub direction: DriverDirection,
    pub impact: DriverImpact,
}

/// Data-quality summary of the inputs behind a regime call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityBadge {
    /// Distinct live providers that contributed
    pub sources: Vec<String>,
    pub stale_count: usize,
    pub stale_used: bool,
    pub fallback_used: bool,
}

/// Scored regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeState {
    pub state: RegimeLabel,
    pub score: u32,
    pub confidence: Confidence,
    pub drivers: Vec<RegimeDriver>,
    pub quality: QualityBadge,
}

/// One scorer input and how it was obtained
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegimeInput {
    pub value: Option<Decimal>,
    pub provider: Option<String>,
    pub stale: bool,
    pub fallback: bool,
}

impl RegimeInput {
    /// Live, fresh input from `provider`
    pub fn live(value: Decimal, provider: &str) -> Self {
        Self {
            value: Some(value),
            provider: Some(provider.to_string()),
            stale: false,
            fallback: false,
        }
    }

    /// Input from an observation with a precomputed staleness verdict
    pub fn from_observation(obs: &RawObservation, stale: bool) -> Self {
        let fallback = obs.is_fallback();
        Self {
            value: obs.value,
            provider: (!fallback).then(|| obs.provider.clone()),
            stale,
            fallback,
        }
    }
}

/// Market and macro drivers consumed by the scorer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegimeInputs {
    pub spx_change: RegimeInput,
    pub nasdaq_change: RegimeInput,
    pub dow_change: RegimeInput,
    pub fed_funds: RegimeInput,
    pub unemployment: RegimeInput,
}

impl RegimeInputs {
    fn all(&self) -> [&RegimeInput; 5] {
        [
            &self.spx_change,
            &self.nasdaq_change,
            &self.dow_change,
            &self.fed_funds,
            &self.unemployment,
        ]
    }

    /// Quality summary across every input
    pub fn quality(&self) -> QualityBadge {
        let sources: BTreeSet<&str> = self
            .all()
            .iter()
            .filter_map(|i| i.provider.as_deref())
            .collect();
        let stale_count = self.all().iter().filter(|i| i.stale).count();
        QualityBadge {
            sources: sources.into_iter().map(str::to_string).collect(),
            stale_count,
            stale_used: stale_count > 0,
            fallback_used: self.all().iter().any(|i| i.fallback),
        }
    }

    /// Equity daily changes that have a value
    pub fn equity_changes(&self) -> Vec<Decimal> {
        [&self.spx_change, &self.nasdaq_change, &self.dow_change]
            .iter()
            .filter_map(|i| i.value)
            .collect()
    }
}
