//! Observation types shared by providers and the metric source

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where an observation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationSource {
    /// Live upstream provider
    Primary,
    /// Static fallback table
    Mock,
}

/// Data-quality markers attached to an observation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFlags {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub missing: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

/// One value for one symbol, as returned by the metric source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub symbol: String,
    pub source: ObservationSource,
    /// Upstream name (`fred`, `alpha_vantage`, `coingecko`, `mock`)
    pub provider: String,
    pub value: Option<Decimal>,
    /// ISO date or RFC 3339 timestamp
    pub as_of: Option<String>,
    pub unit: String,
    pub quality_flags: QualityFlags,
}

impl RawObservation {
    /// Observation with no value and no date
    pub fn missing(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            source: ObservationSource::Mock,
            provider: "none".to_string(),
            value: None,
            as_of: None,
            unit: String::new(),
            quality_flags: QualityFlags {
                missing: true,
                fallback: true,
                ..Default::default()
            },
        }
    }

    /// True when the value did not come from the live provider
    pub fn is_fallback(&self) -> bool {
        self.quality_flags.fallback || self.source == ObservationSource::Mock
    }
}

/// Latest reading from an upstream provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReading {
    pub value: Option<Decimal>,
    pub as_of: Option<String>,
    pub unit: String,
}

/// One dated point of a historical series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// ISO date (`YYYY-MM-DD`)
    pub as_of: String,
    pub value: Option<Decimal>,
}

/// Upstream fetch errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status
    #[error("{provider} returned status {status}")]
    Status { provider: &'static str, status: u16 },
    /// Upstream throttled the request
    #[error("{0} rate limit reached")]
    RateLimited(&'static str),
    /// Payload did not have the expected shape
    #[error("Failed to parse {provider} response: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },
    /// Payload parsed but carried no usable value
    #[error("No data for {0}")]
    NoData(String),
    /// No provider serves the symbol
    #[error("Unsupported symbol: {0}")]
    Unsupported(String),
    /// Provider credentials absent
    #[error("Missing API key for {0}")]
    MissingApiKey(&'static str),
}

impl SourceError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Http(_) | SourceError::RateLimited(_) => true,
            SourceError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Decode a response body, reporting shape mismatches as [`SourceError::Parse`]
pub(crate) fn decode_body<T: DeserializeOwned>(
    provider: &'static str,
    body: &str,
) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Parse {
        provider,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_observation_flags() {
        let obs = RawObservation::missing("UNRATE");
        assert!(obs.value.is_none());
        assert!(obs.as_of.is_none());
        assert!(obs.quality_flags.missing);
        assert!(obs.quality_flags.fallback);
        assert!(obs.is_fallback());
    }

    #[test]
    fn test_mock_source_counts_as_fallback() {
        let obs = RawObservation {
            symbol: "DGS10".to_string(),
            source: ObservationSource::Mock,
            provider: "mock".to_string(),
            value: Some(dec!(4.2)),
            as_of: Some("2024-01-02".to_string()),
            unit: "%".to_string(),
            quality_flags: QualityFlags::default(),
        };
        assert!(obs.is_fallback());
    }

    #[test]
    fn test_quality_flags_serialize_only_set_fields() {
        let flags = QualityFlags {
            fallback: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, r#"{"fallback":true}"#);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(SourceError::RateLimited("fred").is_retryable());
        assert!(SourceError::Status {
            provider: "fred",
            status: 503
        }
        .is_retryable());
        assert!(!SourceError::Status {
            provider: "fred",
            status: 400
        }
        .is_retryable());
        assert!(!SourceError::NoData("X".to_string()).is_retryable());
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let err = decode_body::<Vec<HistoryPoint>>("fred", "<html>oops</html>").unwrap_err();
        assert!(matches!(err, SourceError::Parse { provider: "fred", .. }));
        assert!(!err.is_retryable());
    }
}
