//! regime-signals: market regime signals from unreliable macro and market feeds
//!
//! This library provides the core components for:
//! - A static registry of features grouped into sleeves
//! - Resilient metric sources over FRED, Alpha Vantage and CoinGecko with
//!   retry, mock fallback and batch caching
//! - SLA staleness checks and quality-adjusted feature snapshots
//! - Regime scoring, per-sleeve quality and drift monitoring
//! - Probability-normalized theses with bounded history
//! - Deterministic replay snapshots with a determinism check
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod clock;
pub mod config;
pub mod drift;
pub mod engine;
pub mod outcome;
pub mod quality;
pub mod regime;
pub mod registry;
pub mod replay;
pub mod snapshot;
pub mod source;
pub mod telemetry;
pub mod thesis;
