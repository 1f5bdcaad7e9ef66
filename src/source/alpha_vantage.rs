//! Alpha Vantage client for equity ETF daily changes

use super::types::{decode_body, ProviderReading, SourceError};
use super::Provider;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Alpha Vantage API base URL
pub const ALPHA_VANTAGE_API_URL: &str = "https://www.alphavantage.co";

const PROVIDER: &str = "alpha_vantage";

/// Configuration for the Alpha Vantage client
#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            base_url: ALPHA_VANTAGE_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for the `GLOBAL_QUOTE` endpoint
pub struct AlphaVantageClient {
    config: AlphaVantageConfig,
    client: Client,
}

impl AlphaVantageClient {
    pub fn with_config(config: AlphaVantageConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl Provider for AlphaVantageClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, symbol: &str) -> Result<ProviderReading, SourceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingApiKey(PROVIDER))?;
        let url = format!("{}/query", self.config.base_url);

        tracing::debug!(symbol, "Fetching Alpha Vantage quote");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let body: QuoteResponse = decode_body(PROVIDER, &response.text().await?)?;
        parse_quote(symbol, body)
    }
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "Global Quote")]
    quote: Option<GlobalQuote>,
    /// Throttling notice returned with HTTP 200
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

fn parse_quote(symbol: &str, body: QuoteResponse) -> Result<ProviderReading, SourceError> {
    if body.note.is_some() || body.information.is_some() {
        return Err(SourceError::RateLimited(PROVIDER));
    }
    let quote = body
        .quote
        .ok_or_else(|| SourceError::NoData(symbol.to_string()))?;

    let value = quote
        .change_percent
        .as_deref()
        .map(|p| p.trim().trim_end_matches('%'))
        .and_then(|p| Decimal::from_str(p).ok());

    if value.is_none() && quote.latest_trading_day.is_none() {
        return Err(SourceError::NoData(symbol.to_string()));
    }

    Ok(ProviderReading {
        value,
        as_of: quote.latest_trading_day,
        unit: "pct_change".to_string(),
    })
}
