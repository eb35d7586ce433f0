/// Bisq price node client
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{PriceError, Result};
use crate::feed::SnapshotSource;
use crate::types::{MarketSnapshot, PriceQuote};

pub const DEFAULT_FEED_URL: &str = "https://price.bisq.wiz.biz/getAllMarketPrices";

#[derive(Debug, Deserialize)]
struct MarketPricesResponse {
    data: Vec<MarketPrice>,
}

#[derive(Debug, Deserialize)]
struct MarketPrice {
    #[serde(rename = "currencyCode")]
    currency_code: String,
    price: f64,
    /// Despite the name, the price node reports milliseconds here
    #[serde(rename = "timestampSec")]
    timestamp_millis: i64,
    #[serde(default)]
    provider: String,
}

impl From<MarketPrice> for PriceQuote {
    fn from(p: MarketPrice) -> Self {
        PriceQuote {
            currency_code: p.currency_code,
            price: p.price,
            observed_at_millis: p.timestamp_millis,
            provider: p.provider,
        }
    }
}

/// Decode a `getAllMarketPrices` response body
pub fn parse_market_prices(body: &[u8]) -> Result<MarketSnapshot> {
    let response: MarketPricesResponse = serde_json::from_slice(body)?;
    Ok(MarketSnapshot::new(
        response.data.into_iter().map(PriceQuote::from).collect(),
    ))
}

pub struct BisqClient {
    client: Client,
    url: String,
}

impl BisqClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PriceError::FeedUnavailable)?;
        Ok(BisqClient {
            client,
            url: url.into(),
        })
    }
}

impl SnapshotSource for BisqClient {
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let snapshot = parse_market_prices(&body)?;
        debug!("Fetched {} quotes from {}", snapshot.len(), self.url);
        Ok(snapshot)
    }
}
