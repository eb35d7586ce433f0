use serde::{Deserialize, Serialize};

use crate::types::PriceQuote;

#[derive(Debug, Deserialize)]
pub struct PointParams {
    /// Epoch seconds
    pub uts: i64,
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start: i64,
    pub end: i64,
}

/// Wire form of a stored quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResp {
    pub code: String,
    /// Bucket start, epoch seconds
    pub uts: i64,
    pub price: f32,
    pub provider: String,
}

impl From<PriceQuote> for PriceResp {
    fn from(q: PriceQuote) -> Self {
        PriceResp {
            uts: q.observed_at_secs(),
            code: q.currency_code,
            price: q.price as f32,
            provider: q.provider,
        }
    }
}
