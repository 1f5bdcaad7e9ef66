//! Feature registry types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named bucket of related market factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sleeve {
    Rates,
    Fx,
    Credit,
    Volatility,
    Commodities,
    Macro,
    Equities,
}

impl Sleeve {
    /// All sleeves in declaration order
    pub const ALL: [Sleeve; 7] = [
        Sleeve::Rates,
        Sleeve::Fx,
        Sleeve::Credit,
        Sleeve::Volatility,
        Sleeve::Commodities,
        Sleeve::Macro,
        Sleeve::Equities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sleeve::Rates => "rates",
            Sleeve::Fx => "fx",
            Sleeve::Credit => "credit",
            Sleeve::Volatility => "volatility",
            Sleeve::Commodities => "commodities",
            Sleeve::Macro => "macro",
            Sleeve::Equities => "equities",
        }
    }
}

impl fmt::Display for Sleeve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected publication cadence of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFreq {
    Intraday,
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

/// Upstream that serves a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Fred,
    AlphaVantage,
    CoinGecko,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Fred => "fred",
            ProviderKind::AlphaVantage => "alpha_vantage",
            ProviderKind::CoinGecko => "coingecko",
        }
    }
}

/// Static description of one tracked feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub feature_id: String,
    pub symbol: String,
    pub sleeve: Sleeve,
    pub label: String,
    /// Base weight in (0, 1]
    pub weight_base: Decimal,
    pub target_freq: TargetFreq,
    pub sla_minutes: i64,
    pub provider: ProviderKind,
}

impl FeatureSpec {
    /// Create a feature whose id is derived from sleeve and symbol
    pub fn new(
        symbol: &str,
        sleeve: Sleeve,
        label: &str,
        weight_base: Decimal,
        target_freq: TargetFreq,
        sla_minutes: i64,
        provider: ProviderKind,
    ) -> Self {
        Self {
            feature_id: format!("{}.{}", sleeve.as_str(), symbol.to_lowercase()),
            symbol: symbol.to_string(),
            sleeve,
            label: label.to_string(),
            weight_base,
            target_freq,
            sla_minutes,
            provider,
        }
    }
}
