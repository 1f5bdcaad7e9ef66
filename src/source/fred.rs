//! FRED client for macro, rates, credit and commodity series
//!
//! Latest values and full histories both come from the
//! `series/observations` endpoint. FRED encodes missing observations as ".".

use super::types::{decode_body, HistoryPoint, ProviderReading, SourceError};
use super::{HistorySource, Provider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// FRED API base URL
pub const FRED_API_URL: &str = "https://api.stlouisfed.org/fred";

const PROVIDER: &str = "fred";

/// Configuration for the FRED client
#[derive(Debug, Clone)]
pub struct FredConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for FredConfig {
    fn default() -> Self {
        Self {
            base_url: FRED_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for the FRED observations API
pub struct FredClient {
    config: FredConfig,
    client: Client,
}

impl FredClient {
    pub fn with_config(config: FredConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    async fn observations(
        &self,
        series_id: &str,
        descending: bool,
        limit: Option<u32>,
    ) -> Result<Vec<FredObservation>, SourceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingApiKey(PROVIDER))?;
        let url = format!("{}/series/observations", self.config.base_url);
        let sort_order = if descending { "desc" } else { "asc" };

        let mut query = vec![
            ("series_id", series_id.to_string()),
            ("api_key", api_key.to_string()),
            ("file_type", "json".to_string()),
            ("sort_order", sort_order.to_string()),
        ];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        tracing::debug!(series_id, sort_order, "Fetching FRED observations");

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited(PROVIDER));
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body: FredResponse = decode_body(PROVIDER, &response.text().await?)?;
        Ok(body.observations)
    }
}

#[async_trait]
impl Provider for FredClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, symbol: &str) -> Result<ProviderReading, SourceError> {
        let observations = self.observations(symbol, true, Some(1)).await?;
        let latest = observations
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NoData(symbol.to_string()))?;

        Ok(ProviderReading {
            value: parse_fred_value(&latest.value),
            as_of: Some(latest.date),
            unit: "level".to_string(),
        })
    }
}

#[async_trait]
impl HistorySource for FredClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn history(&self, series_id: &str) -> Result<Vec<HistoryPoint>, SourceError> {
        let observations = self.observations(series_id, false, None).await?;
        Ok(observations
            .into_iter()
            .map(|o| HistoryPoint {
                value: parse_fred_value(&o.value),
                as_of: o.date,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct FredResponse {
    #[serde(default)]
    observations: Vec<FredObservation>,
}

#[derive(Debug, Deserialize)]
struct FredObservation {
    date: String,
    value: String,
}

/// Parse a FRED value string; "." marks a missing observation
fn parse_fred_value(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}
