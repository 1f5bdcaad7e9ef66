//! Per-symbol data-quality report using the fixed threshold table

use super::staleness::{parse_as_of, staleness_threshold};
use crate::source::RawObservation;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Status of one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolQuality {
    pub symbol: String,
    pub as_of: Option<String>,
    pub age_days: Option<i64>,
    pub threshold_days: i64,
    pub stale: bool,
    pub missing: bool,
    pub fallback: bool,
}

/// Staleness report across a set of observations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualityReport {
    pub generated_at: DateTime<Utc>,
    pub stale_count: usize,
    pub missing_count: usize,
    pub fallback_count: usize,
    pub symbols: Vec<SymbolQuality>,
}

impl DataQualityReport {
    /// Build a report sorted by symbol
    pub fn build(observations: &HashMap<String, RawObservation>, now: DateTime<Utc>) -> Self {
        let mut symbols: Vec<SymbolQuality> = observations
            .values()
            .map(|obs| {
                let threshold = staleness_threshold(&obs.symbol);
                let age = obs
                    .as_of
                    .as_deref()
                    .and_then(parse_as_of)
                    .map(|ts| now - ts);
                let stale = match age {
                    Some(age) => age > threshold,
                    None => true,
                };
                SymbolQuality {
                    symbol: obs.symbol.clone(),
                    as_of: obs.as_of.clone(),
                    age_days: age.map(|a| a.num_days()),
                    threshold_days: threshold.num_days(),
                    stale,
                    missing: obs.value.is_none() || obs.quality_flags.missing,
                    fallback: obs.is_fallback(),
                }
            })
            .collect();
        symbols.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        Self {
            generated_at: now,
            stale_count: symbols.iter().filter(|s| s.stale).count(),
            missing_count: symbols.iter().filter(|s| s.missing).count(),
            fallback_count: symbols.iter().filter(|s| s.fallback).count(),
            symbols,
        }
    }
}
