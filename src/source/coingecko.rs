//! CoinGecko client for crypto risk proxies

use super::types::{decode_body, ProviderReading, SourceError};
use super::Provider;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// CoinGecko public API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

const PROVIDER: &str = "coingecko";

/// Configuration for the CoinGecko client
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for the `simple/price` endpoint
pub struct CoinGeckoClient {
    config: CoinGeckoConfig,
    client: Client,
}

impl CoinGeckoClient {
    pub fn with_config(config: CoinGeckoConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl Provider for CoinGeckoClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, symbol: &str) -> Result<ProviderReading, SourceError> {
        let url = format!("{}/simple/price", self.config.base_url);

        tracing::debug!(coin = symbol, "Fetching CoinGecko price");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", symbol),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_last_updated_at", "true"),
            ])
            .send()
            .await?;

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

        let body: HashMap<String, CoinPrice> = decode_body(PROVIDER, &response.text().await?)?;
        parse_price(symbol, body)
    }
}

#[derive(Debug, Deserialize)]
struct CoinPrice {
    usd_24h_change: Option<f64>,
    last_updated_at: Option<i64>,
}

fn parse_price(
    symbol: &str,
    mut body: HashMap<String, CoinPrice>,
) -> Result<ProviderReading, SourceError> {
    let price = body
        .remove(symbol)
        .ok_or_else(|| SourceError::NoData(symbol.to_string()))?;

    let value = price
        .usd_24h_change
        .and_then(|c| Decimal::try_from(c).ok())
        .map(|d| d.round_dp(4));
    let as_of = price
        .last_updated_at
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .map(|dt| dt.to_rfc3339());

    Ok(ProviderReading {
        value,
        as_of,
        unit: "pct_change".to_string(),
    })
}
