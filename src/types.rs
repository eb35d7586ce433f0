/// Core type definitions for the price store
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data::codec::{BucketWidth, KeyLayout};
use crate::error::PriceError;

/// One observed price as produced by the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub currency_code: String,
    pub price: f64,
    /// Epoch milliseconds
    pub observed_at_millis: i64,
    #[serde(default)]
    pub provider: String,
}

impl PriceQuote {
    pub fn new(
        currency_code: impl Into<String>,
        price: f64,
        observed_at_millis: i64,
        provider: impl Into<String>,
    ) -> Self {
        PriceQuote {
            currency_code: currency_code.into(),
            price,
            observed_at_millis,
            provider: provider.into(),
        }
    }

    /// Observation time truncated to whole epoch seconds
    pub fn observed_at_secs(&self) -> i64 {
        self.observed_at_millis.div_euclid(1000)
    }
}

/// One fetch worth of quotes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub quotes: Vec<PriceQuote>,
}

impl MarketSnapshot {
    pub fn new(quotes: Vec<PriceQuote>) -> Self {
        MarketSnapshot { quotes }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Quote currencies the store accepts, each priced against BTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SupportedCurrency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "JPY")]
    Jpy,
}

impl SupportedCurrency {
    pub fn all() -> &'static [SupportedCurrency] {
        &[SupportedCurrency::Usd, SupportedCurrency::Jpy]
    }

    /// Canonical label used in storage keys and feed payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedCurrency::Usd => "USD",
            SupportedCurrency::Jpy => "JPY",
        }
    }

    /// Exact, case-sensitive match against a feed currency code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == code)
    }
}

impl fmt::Display for SupportedCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parse for human input ("usd", "Jpy", ...)
impl FromStr for SupportedCurrency {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SupportedCurrency::from_code(&s.trim().to_uppercase())
            .ok_or_else(|| PriceError::UnsupportedCurrency(s.to_string()))
    }
}

/// Configuration for the price server
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub debug: bool,
    pub store: StoreConfig,
    pub ingest: IngestConfig,
    pub server: ServerConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: String,
    pub bucket_width: BucketWidth,
    pub key_layout: KeyLayout,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: "bitprice_db".to_string(),
            bucket_width: BucketWidth::default(),
            key_layout: KeyLayout::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Cadence as a duration string, e.g. "10s"
    pub interval: String,
    pub currencies: Vec<SupportedCurrency>,
    pub feed_url: String,
    pub request_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            interval: "10s".to_string(),
            currencies: SupportedCurrency::all().to_vec(),
            feed_url: crate::feed::DEFAULT_FEED_URL.to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: "127.0.0.1:9991".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub reject_empty_ranges: bool,
}

impl Config {
    pub fn effective_log_level(&self) -> String {
        if self.debug {
            "bitprice=debug,info".to_string()
        } else if self.log_level.is_empty() {
            "info".to_string()
        } else {
            self.log_level.clone()
        }
    }
}
