//! Metric sources
//!
//! Upstream provider clients plus the resilient wrapper that never fails:
//! every symbol comes back as a live observation, a mock fallback, or a
//! fully-missing observation.

mod alpha_vantage;
mod cache;
mod coingecko;
mod fred;
mod mock;
mod retry;
mod types;

pub use alpha_vantage::{AlphaVantageClient, AlphaVantageConfig, ALPHA_VANTAGE_API_URL};
pub use cache::{batch_key, Cache, MemoryCache};
pub use coingecko::{CoinGeckoClient, CoinGeckoConfig, COINGECKO_API_URL};
pub use fred::{FredClient, FredConfig, FRED_API_URL};
pub use mock::MockTable;
pub use retry::RetryPolicy;
pub use types::{
    HistoryPoint, ObservationSource, ProviderReading, QualityFlags, RawObservation, SourceError,
};

use crate::clock::Clock;
use crate::outcome::partition_results;
use crate::registry::{FeatureRegistry, ProviderKind};
use crate::telemetry;
use async_trait::async_trait;
use chrono::Duration;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// Upstream that returns the latest reading for a symbol
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, symbol: &str) -> Result<ProviderReading, SourceError>;
}

/// Upstream that returns the full dated history of a series
#[async_trait]
pub trait HistorySource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn history(&self, series_id: &str) -> Result<Vec<HistoryPoint>, SourceError>;
}

/// Observations for a batch of symbols plus advisory errors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchObservations {
    pub observations: HashMap<String, RawObservation>,
    pub errors: Vec<String>,
}

impl BatchObservations {
    pub fn get(&self, symbol: &str) -> Option<&RawObservation> {
        self.observations.get(symbol)
    }
}

/// Never-failing source of observations
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Latest observation for one symbol
    async fn fetch(&self, symbol: &str) -> RawObservation;
    /// Latest observations for a set of symbols
    async fn fetch_batch(&self, symbols: &[String]) -> BatchObservations;
}

/// Metric source with retry, mock fallback and batch caching
pub struct ResilientSource {
    providers: HashMap<ProviderKind, Arc<dyn Provider>>,
    routes: HashMap<String, ProviderKind>,
    mock: MockTable,
    cache: Arc<dyn Cache<BatchObservations>>,
    cache_ttl: Duration,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl ResilientSource {
    /// Create a source routing each registry symbol to its provider
    pub fn new(
        registry: &FeatureRegistry,
        mock: MockTable,
        cache: Arc<dyn Cache<BatchObservations>>,
        cache_ttl: Duration,
        retry: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let routes = registry
            .specs()
            .iter()
            .map(|s| (s.symbol.clone(), s.provider))
            .collect();
        Self {
            providers: HashMap::new(),
            routes,
            mock,
            cache,
            cache_ttl,
            retry,
            clock,
        }
    }

    /// Register the client serving a provider kind
    pub fn with_provider(mut self, kind: ProviderKind, provider: Arc<dyn Provider>) -> Self {
        self.providers.insert(kind, provider);
        self
    }

    async fn fetch_primary(&self, symbol: &str) -> Result<RawObservation, (String, SourceError)> {
        let provider = self
            .routes
            .get(symbol)
            .and_then(|kind| self.providers.get(kind))
            .ok_or_else(|| (symbol.to_string(), SourceError::Unsupported(symbol.to_string())))?;

        let result = self
            .retry
            .run(symbol, || provider.fetch(symbol))
            .await;

        match result {
            Ok(reading) => {
                telemetry::record_fetch(provider.name(), true);
                let missing = reading.value.is_none();
                Ok(RawObservation {
                    symbol: symbol.to_string(),
                    source: ObservationSource::Primary,
                    provider: provider.name().to_string(),
                    value: reading.value,
                    as_of: reading.as_of.clone(),
                    unit: reading.unit,
                    quality_flags: QualityFlags {
                        missing,
                        partial: missing && reading.as_of.is_some(),
                        ..Default::default()
                    },
                })
            }
            Err(e) => {
                telemetry::record_fetch(provider.name(), false);
                Err((symbol.to_string(), e))
            }
        }
    }

    fn fallback(&self, symbol: &str, error: &SourceError) -> RawObservation {
        tracing::warn!(symbol, error = %error, "Using fallback observation");
        telemetry::record_fallback(symbol);
        self.mock.fallback(symbol, self.clock.now())
    }
}

#[async_trait]
impl MetricSource for ResilientSource {
    async fn fetch(&self, symbol: &str) -> RawObservation {
        match self.fetch_primary(symbol).await {
            Ok(obs) => obs,
            Err((symbol, e)) => self.fallback(&symbol, &e),
        }
    }

    async fn fetch_batch(&self, symbols: &[String]) -> BatchObservations {
        let key = batch_key(symbols);
        if let Some(hit) = self.cache.get(&key).await {
            telemetry::record_cache_hit();
            tracing::debug!(key = %key, "Batch cache hit");
            return hit;
        }

        let mut distinct: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
        distinct.sort_unstable();
        distinct.dedup();

        let results = join_all(distinct.iter().map(|s| self.fetch_primary(s))).await;
        let (fetched, failed) = partition_results(results);

        let mut batch = BatchObservations::default();
        for obs in fetched {
            batch.observations.insert(obs.symbol.clone(), obs);
        }
        for (symbol, e) in failed {
            batch.errors.push(format!("{}: {}", symbol, e));
            let obs = self.fallback(&symbol, &e);
            batch.observations.insert(symbol, obs);
        }

        tracing::info!(
            symbols = distinct.len(),
            errors = batch.errors.len(),
            "Fetched observation batch"
        );

        self.cache.set(&key, batch.clone(), self.cache_ttl).await;
        batch
    }
}
