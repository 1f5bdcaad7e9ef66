//! Integration tests for configuration loading

use regime_signals::config::{Config, LogFormat};
use rust_decimal_macros::dec;
use std::io::Write;

#[test]
fn test_config_example_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();
    assert_eq!(config.staleness.sla_slack_factor, 2.0);
    assert_eq!(config.thesis.alternative_probability, dec!(30));
    assert_eq!(config.thesis.history_limit, 100);
    assert_eq!(config.replay.window_days, 30);
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[thesis]\nalternative_probability = 20").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.thesis.alternative_probability, dec!(20));
    assert_eq!(config.thesis.history_limit, 100);
    assert_eq!(config.source.retry_attempts, 3);
    assert_eq!(config.regime.base_score, dec!(50));
}

#[test]
fn test_malformed_config_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[staleness]\nsla_slack_factor = \"two\"").unwrap();
    assert!(Config::load(file.path()).is_err());
}
