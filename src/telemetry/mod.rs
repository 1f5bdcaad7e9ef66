//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use self::metrics::{
    init_metrics, record_cache_hit, record_fallback, record_fetch, set_gauge, CounterMetric,
    GaugeMetric,
};
pub use crate::config::LogFormat;
pub use logging::init_logging;

use crate::config::TelemetryConfig;

/// Guard held for the lifetime of the process
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        init_metrics(port)?;
    }

    Ok(TelemetryGuard { _priv: () })
}
