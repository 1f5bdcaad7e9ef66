//! Static fallback values used when a live provider is unavailable

use super::types::{ObservationSource, QualityFlags, RawObservation};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Symbol to `(value, unit)` fallback table
#[derive(Debug, Clone)]
pub struct MockTable {
    values: HashMap<String, (Decimal, String)>,
}

impl MockTable {
    /// Empty table: every fallback degrades to a missing observation
    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn with_value(mut self, symbol: &str, value: Decimal, unit: &str) -> Self {
        self.values
            .insert(symbol.to_string(), (value, unit.to_string()));
        self
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.values.contains_key(symbol)
    }

    /// Fallback observation for a symbol, dated at `now`
    pub fn fallback(&self, symbol: &str, now: DateTime<Utc>) -> RawObservation {
        match self.values.get(symbol) {
            Some((value, unit)) => RawObservation {
                symbol: symbol.to_string(),
                source: ObservationSource::Mock,
                provider: "mock".to_string(),
                value: Some(*value),
                as_of: Some(now.date_naive().to_string()),
                unit: unit.clone(),
                quality_flags: QualityFlags {
                    fallback: true,
                    ..Default::default()
                },
            },
            None => RawObservation::missing(symbol),
        }
    }
}

impl Default for MockTable {
    fn default() -> Self {
        let pct = "%";
        Self::empty()
            .with_value("FEDFUNDS", dec!(5.33), pct)
            .with_value("DGS2", dec!(4.35), pct)
            .with_value("DGS10", dec!(4.20), pct)
            .with_value("DGS30", dec!(4.38), pct)
            .with_value("T10Y2Y", dec!(-0.15), pct)
            .with_value("DTWEXBGS", dec!(121.4), "index")
            .with_value("DEXUSEU", dec!(1.09), "usd")
            .with_value("DEXJPUS", dec!(148.2), "jpy")
            .with_value("BAMLH0A0HYM2", dec!(3.45), pct)
            .with_value("BAMLC0A0CM", dec!(1.05), pct)
            .with_value("VIXCLS", dec!(14.8), "index")
            .with_value("DCOILWTICO", dec!(76.3), "usd")
            .with_value("DCOILBRENTEU", dec!(81.1), "usd")
            .with_value("UNRATE", dec!(3.9), pct)
            .with_value("CPIAUCSL", dec!(308.4), "index")
            .with_value("PAYEMS", dec!(157232), "thousands")
            .with_value("ICSA", dec!(212000), "claims")
            .with_value("SPY", dec!(0.25), "pct_change")
            .with_value("QQQ", dec!(0.35), "pct_change")
            .with_value("DIA", dec!(0.10), "pct_change")
            .with_value("bitcoin", dec!(1.2), "pct_change")
    }
}
