//! Feature registry
//!
//! Static catalogue of the series that feed the regime pipeline. Built once
//! at startup and never mutated afterwards.

mod catalog;
mod types;

pub use catalog::default_features;
pub use types::{FeatureSpec, ProviderKind, Sleeve, TargetFreq};

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Registry construction errors
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// Base weight outside (0, 1]
    #[error("Feature {0} has base weight {1} outside (0, 1]")]
    InvalidWeight(String, Decimal),
    /// Two features share an id
    #[error("Duplicate feature id: {0}")]
    DuplicateFeature(String),
    /// SLA must be positive
    #[error("Feature {0} has non-positive SLA")]
    InvalidSla(String),
}

/// Immutable, validated list of feature specs
#[derive(Debug, Clone)]
pub struct FeatureRegistry {
    specs: Vec<FeatureSpec>,
}

impl FeatureRegistry {
    /// Validate and wrap a list of feature specs
    pub fn new(specs: Vec<FeatureSpec>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if spec.weight_base <= Decimal::ZERO || spec.weight_base > Decimal::ONE {
                return Err(RegistryError::InvalidWeight(
                    spec.feature_id.clone(),
                    spec.weight_base,
                ));
            }
            if spec.sla_minutes <= 0 {
                return Err(RegistryError::InvalidSla(spec.feature_id.clone()));
            }
            if !seen.insert(spec.feature_id.clone()) {
                return Err(RegistryError::DuplicateFeature(spec.feature_id.clone()));
            }
        }
        Ok(Self { specs })
    }

    /// The built-in catalogue
    pub fn builtin() -> Self {
        Self {
            specs: default_features(),
        }
    }

    pub fn specs(&self) -> &[FeatureSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Find the first spec for a symbol
    pub fn get(&self, symbol: &str) -> Option<&FeatureSpec> {
        self.specs.iter().find(|s| s.symbol == symbol)
    }

    /// Distinct symbols in registry order
    pub fn symbols(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.specs
            .iter()
            .filter(|s| seen.insert(s.symbol.as_str()))
            .map(|s| s.symbol.clone())
            .collect()
    }

    /// Specs grouped by sleeve, sleeves in declaration order
    pub fn by_sleeve(&self) -> BTreeMap<Sleeve, Vec<&FeatureSpec>> {
        let mut groups: BTreeMap<Sleeve, Vec<&FeatureSpec>> = BTreeMap::new();
        for spec in &self.specs {
            groups.entry(spec.sleeve).or_default().push(spec);
        }
        groups
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builtin_registry_is_valid() {
        let specs = default_features();
        let registry = FeatureRegistry::new(specs).unwrap();
        assert!(registry.len() >= 30);
    }

    #[test]
    fn test_builtin_covers_every_sleeve() {
        let registry = FeatureRegistry::builtin();
        let groups = registry.by_sleeve();
        for sleeve in Sleeve::ALL {
            assert!(
                groups.get(&sleeve).map(|g| !g.is_empty()).unwrap_or(false),
                "sleeve {} has no features",
                sleeve
            );
        }
    }

    #[test]
    fn test_rejects_zero_weight() {
        let spec = FeatureSpec::new(
            "DGS10",
            Sleeve::Rates,
            "10Y",
            dec!(0),
            TargetFreq::Daily,
            1440,
            ProviderKind::Fred,
        );
        let err = FeatureRegistry::new(vec![spec]).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidWeight(_, _)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let spec = FeatureSpec::new(
            "DGS10",
            Sleeve::Rates,
            "10Y",
            dec!(0.5),
            TargetFreq::Daily,
            1440,
            ProviderKind::Fred,
        );
        let err = FeatureRegistry::new(vec![spec.clone(), spec]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateFeature("rates.dgs10".to_string()));
    }

    #[test]
    fn test_lookup_by_symbol() {
        let registry = FeatureRegistry::builtin();
        let unrate = registry.get("UNRATE").unwrap();
        assert_eq!(unrate.sleeve, Sleeve::Macro);
        assert!(registry.get("NOPE").is_none());
    }

    #[test]
    fn test_symbols_are_distinct() {
        let registry = FeatureRegistry::builtin();
        let symbols = registry.symbols();
        let unique: HashSet<_> = symbols.iter().collect();
        assert_eq!(symbols.len(), unique.len());
    }
}
