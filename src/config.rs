//! Configuration types for regime-signals

use crate::regime::RegimeConfig;
use crate::source::{
    AlphaVantageConfig, CoinGeckoConfig, FredConfig, RetryPolicy, ALPHA_VANTAGE_API_URL,
    COINGECKO_API_URL, FRED_API_URL,
};
use crate::thesis::ThesisConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub staleness: StalenessConfig,
    pub regime: RegimeConfig,
    pub thesis: ThesisConfig,
    pub replay: ReplayConfig,
    pub telemetry: TelemetryConfig,
}

/// Upstream provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub fred_base_url: String,
    pub fred_api_key: Option<String>,
    pub alpha_vantage_base_url: String,
    pub alpha_vantage_api_key: Option<String>,
    pub coingecko_base_url: String,
    /// HTTP timeout per request
    pub timeout_secs: u64,
    /// Lifetime of a cached observation batch
    pub cache_ttl_secs: i64,
    pub retry_attempts: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            fred_base_url: FRED_API_URL.to_string(),
            fred_api_key: None,
            alpha_vantage_base_url: ALPHA_VANTAGE_API_URL.to_string(),
            alpha_vantage_api_key: None,
            coingecko_base_url: COINGECKO_API_URL.to_string(),
            timeout_secs: 10,
            cache_ttl_secs: 300,
            retry_attempts: 3,
            retry_base_delay_ms: 250,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs.max(0))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }

    pub fn fred(&self) -> FredConfig {
        FredConfig {
            base_url: self.fred_base_url.clone(),
            api_key: self.fred_api_key.clone(),
            timeout: self.timeout(),
        }
    }

    pub fn alpha_vantage(&self) -> AlphaVantageConfig {
        AlphaVantageConfig {
            base_url: self.alpha_vantage_base_url.clone(),
            api_key: self.alpha_vantage_api_key.clone(),
            timeout: self.timeout(),
        }
    }

    pub fn coingecko(&self) -> CoinGeckoConfig {
        CoinGeckoConfig {
            base_url: self.coingecko_base_url.clone(),
            timeout: self.timeout(),
        }
    }
}

/// Staleness configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StalenessConfig {
    /// Multiplier applied to a feature SLA before it counts as stale
    pub sla_slack_factor: f64,
    /// Window used for per-sleeve freshness
    pub freshness_window_days: i64,
}

impl Default for StalenessConfig {
    fn default() -> Self {
        Self {
            sla_slack_factor: crate::quality::DEFAULT_SLA_SLACK_FACTOR,
            freshness_window_days: 7,
        }
    }
}

/// Replay job configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub window_days: u32,
    /// FRED series ids replayed when none are given on the command line
    pub series: Vec<String>,
    pub output_dir: PathBuf,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            series: ["DGS2", "DGS10", "T10Y2Y", "BAMLH0A0HYM2", "VIXCLS", "DCOILWTICO"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_dir: PathBuf::from("./replay"),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Prometheus exporter port; disabled when absent
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file, then apply environment API keys
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Fill API keys missing from the file from `FRED_API_KEY` and
    /// `ALPHA_VANTAGE_API_KEY`
    pub fn apply_env(&mut self) {
        if self.source.fred_api_key.is_none() {
            self.source.fred_api_key = std::env::var("FRED_API_KEY").ok();
        }
        if self.source.alpha_vantage_api_key.is_none() {
            self.source.alpha_vantage_api_key = std::env::var("ALPHA_VANTAGE_API_KEY").ok();
        }
    }
}
