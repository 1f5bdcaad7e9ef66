//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Upstream provider fetches, labelled by provider and outcome
    UpstreamFetch,
    /// Observations served from the mock table
    Fallback,
    /// Observation batches served from cache
    CacheHit,
}

impl CounterMetric {
    pub fn name(&self) -> &'static str {
        match self {
            CounterMetric::UpstreamFetch => "regime_upstream_fetch_total",
            CounterMetric::Fallback => "regime_fallback_total",
            CounterMetric::CacheHit => "regime_cache_hits_total",
        }
    }
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Latest regime score
    RegimeScore,
    /// Latest drift stale ratio
    DriftStaleRatio,
    /// Rows in the latest replay build
    ReplayRows,
}

impl GaugeMetric {
    pub fn name(&self) -> &'static str {
        match self {
            GaugeMetric::RegimeScore => "regime_score",
            GaugeMetric::DriftStaleRatio => "regime_drift_stale_ratio",
            GaugeMetric::ReplayRows => "regime_replay_rows",
        }
    }
}

/// Count one upstream fetch
pub fn record_fetch(provider: &'static str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!(
        CounterMetric::UpstreamFetch.name(),
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
}

/// Count one fallback observation
pub fn record_fallback(symbol: &str) {
    metrics::counter!(CounterMetric::Fallback.name(), "symbol" => symbol.to_string()).increment(1);
}

pub fn record_cache_hit() {
    metrics::counter!(CounterMetric::CacheHit.name()).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}

/// Install the Prometheus recorder with an HTTP scrape endpoint
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;
    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}
