//! Snapshot construction

use super::FeatureSnapshot;
use crate::quality::StalenessEvaluator;
use crate::registry::FeatureRegistry;
use crate::source::RawObservation;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Weight multiplier for stale observations
pub const STALE_FACTOR: Decimal = dec!(0.7);
/// Weight multiplier for fallback observations; dominates staleness
pub const FALLBACK_FACTOR: Decimal = dec!(0.4);

/// Quality multiplier for an observation's state
pub fn quality_factor(stale: bool, fallback: bool) -> Decimal {
    if fallback {
        FALLBACK_FACTOR
    } else if stale {
        STALE_FACTOR
    } else {
        Decimal::ONE
    }
}

/// Builds feature snapshots in registry order
pub struct FeatureSnapshotBuilder {
    staleness: StalenessEvaluator,
}

impl FeatureSnapshotBuilder {
    pub fn new(staleness: StalenessEvaluator) -> Self {
        Self { staleness }
    }

    /// One snapshot per registry feature; absent observations count as missing
    pub fn build(
        &self,
        registry: &FeatureRegistry,
        observations: &HashMap<String, RawObservation>,
    ) -> Vec<FeatureSnapshot> {
        registry
            .specs()
            .iter()
            .map(|spec| {
                let obs = observations
                    .get(&spec.symbol)
                    .cloned()
                    .unwrap_or_else(|| RawObservation::missing(&spec.symbol));

                let stale = self.staleness.is_stale(obs.as_of.as_deref(), spec.sla_minutes);
                let fallback = obs.is_fallback();
                let effective_weight = (spec.weight_base * quality_factor(stale, fallback))
                    .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);

                FeatureSnapshot {
                    feature_id: spec.feature_id.clone(),
                    symbol: spec.symbol.clone(),
                    sleeve: spec.sleeve,
                    label: spec.label.clone(),
                    value: obs.value,
                    as_of: obs.as_of,
                    source: obs.source,
                    stale,
                    fallback,
                    weight_base: spec.weight_base,
                    effective_weight,
                }
            })
            .collect()
    }
}
