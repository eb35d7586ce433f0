pub mod bisq;

pub use bisq::{parse_market_prices, BisqClient, DEFAULT_FEED_URL};

use std::future::Future;

use crate::error::Result;
use crate::types::MarketSnapshot;

/// Anything that can produce a market snapshot on demand
pub trait SnapshotSource: Send + Sync {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<MarketSnapshot>> + Send;
}
