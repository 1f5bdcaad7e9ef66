//! Per-sleeve coverage and freshness roll-up

use super::staleness::parse_as_of;
use crate::registry::{FeatureRegistry, Sleeve};
use crate::source::RawObservation;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const COVERAGE_WEIGHT: Decimal = dec!(0.6);
const FRESHNESS_WEIGHT: Decimal = dec!(0.4);

/// Quality of one sleeve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub sleeve: Sleeve,
    /// Percent of symbols with a value
    pub coverage: Decimal,
    /// Percent of symbols observed within the freshness window
    pub freshness: Decimal,
    pub quality: u32,
}

/// Quality across all sleeves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub overall_quality: u32,
    pub sleeves: Vec<QualityScore>,
}

/// Rolls observation coverage and freshness up by sleeve
#[derive(Debug, Clone)]
pub struct QualityAggregator {
    freshness_window: Duration,
}

impl QualityAggregator {
    pub fn new(freshness_window: Duration) -> Self {
        Self { freshness_window }
    }

    pub fn assess(
        &self,
        registry: &FeatureRegistry,
        observations: &HashMap<String, RawObservation>,
        now: DateTime<Utc>,
    ) -> QualityAssessment {
        let cutoff = now - self.freshness_window;

        let sleeves: Vec<QualityScore> = registry
            .by_sleeve()
            .into_iter()
            .map(|(sleeve, specs)| {
                let total = specs.len();
                let mut covered = 0usize;
                let mut fresh = 0usize;
                for spec in &specs {
                    let Some(obs) = observations.get(&spec.symbol) else {
                        continue;
                    };
                    if obs.value.is_some() {
                        covered += 1;
                    }
                    let within_window = obs
                        .as_of
                        .as_deref()
                        .and_then(parse_as_of)
                        .map(|ts| ts >= cutoff)
                        .unwrap_or(false);
                    if within_window {
                        fresh += 1;
                    }
                }

                let coverage = percent(covered, total);
                let freshness = percent(fresh, total);
                let quality = round_whole(coverage * COVERAGE_WEIGHT + freshness * FRESHNESS_WEIGHT);

                QualityScore {
                    sleeve,
                    coverage: coverage.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
                    freshness: freshness.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
                    quality,
                }
            })
            .collect();

        let overall_quality = if sleeves.is_empty() {
            0
        } else {
            let sum: Decimal = sleeves.iter().map(|s| Decimal::from(s.quality)).sum();
            round_whole(sum / Decimal::from(sleeves.len()))
        };

        QualityAssessment {
            overall_quality,
            sleeves,
        }
    }
}

impl Default for QualityAggregator {
    fn default() -> Self {
        Self::new(Duration::days(7))
    }
}

fn percent(part: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(100 * part as u64) / Decimal::from(total as u64)
}

fn round_whole(value: Decimal) -> u32 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FeatureSpec, ProviderKind, TargetFreq};
    use crate::source::{ObservationSource, QualityFlags};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap()
    }

    fn spec(symbol: &str, sleeve: Sleeve) -> FeatureSpec {
        FeatureSpec::new(
            symbol,
            sleeve,
            symbol,
            dec!(1),
            TargetFreq::Daily,
            1440,
            ProviderKind::Fred,
        )
    }

    fn obs(symbol: &str, value: Option<Decimal>, as_of: Option<&str>) -> (String, RawObservation) {
        (
            symbol.to_string(),
            RawObservation {
                symbol: symbol.to_string(),
                source: ObservationSource::Primary,
                provider: "fred".to_string(),
                value,
                as_of: as_of.map(str::to_string),
                unit: "%".to_string(),
                quality_flags: QualityFlags::default(),
            },
        )
    }

    #[test]
    fn test_full_quality() {
        let registry = FeatureRegistry::new(vec![spec("DGS2", Sleeve::Rates)]).unwrap();
        let observations = HashMap::from([obs("DGS2", Some(dec!(4.5)), Some("2024-06-07"))]);
        let result = QualityAggregator::default().assess(&registry, &observations, now());
        assert_eq!(result.overall_quality, 100);
        assert_eq!(result.sleeves[0].coverage, dec!(100));
        assert_eq!(result.sleeves[0].freshness, dec!(100));
    }

    #[test]
    fn test_partial_sleeve() {
        let registry = FeatureRegistry::new(vec![
            spec("DGS2", Sleeve::Rates),
            spec("DGS10", Sleeve::Rates),
            spec("DGS30", Sleeve::Rates),
        ])
        .unwrap();
        let observations = HashMap::from([
            obs("DGS2", Some(dec!(4.5)), Some("2024-06-07")),
            obs("DGS10", Some(dec!(4.2)), Some("2024-05-01")),
            obs("DGS30", None, None),
        ]);
        let result = QualityAggregator::default().assess(&registry, &observations, now());
        let rates = &result.sleeves[0];
        // coverage 66.67, freshness 33.33 -> 40 + 13.33 = 53.33
        assert_eq!(rates.coverage, dec!(66.67));
        assert_eq!(rates.freshness, dec!(33.33));
        assert_eq!(rates.quality, 53);
    }

    #[test]
    fn test_overall_is_rounded_mean_of_sleeves() {
        let registry = FeatureRegistry::new(vec![
            spec("DGS2", Sleeve::Rates),
            spec("VIXCLS", Sleeve::Volatility),
        ])
        .unwrap();
        let observations = HashMap::from([obs("DGS2", Some(dec!(4.5)), Some("2024-06-09"))]);
        let result = QualityAggregator::default().assess(&registry, &observations, now());
        assert_eq!(result.sleeves.len(), 2);
        assert_eq!(result.sleeves[0].quality, 100);
        assert_eq!(result.sleeves[1].quality, 0);
        assert_eq!(result.overall_quality, 50);
    }

    #[test]
    fn test_window_boundary_inclusive() {
        let registry = FeatureRegistry::new(vec![spec("DGS2", Sleeve::Rates)]).unwrap();
        let observations = HashMap::from([obs("DGS2", Some(dec!(4.5)), Some("2024-06-03"))]);
        let result = QualityAggregator::default().assess(&registry, &observations, now());
        assert_eq!(result.sleeves[0].freshness, dec!(100));
    }

    #[test]
    fn test_scores_bounded_for_builtin_registry() {
        let registry = FeatureRegistry::builtin();
        let result = QualityAggregator::default().assess(&registry, &HashMap::new(), now());
        assert_eq!(result.sleeves.len(), Sleeve::ALL.len());
        assert!(result.sleeves.iter().all(|s| s.quality <= 100));
        assert_eq!(result.overall_quality, 0);
    }
}
