/// Read-side adapter: calendar-time lookups in epoch seconds
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::data::{BucketWidth, PriceRange, PriceStore};
use crate::error::{PriceError, Result};
use crate::types::{PriceQuote, SupportedCurrency};

pub struct QueryFacade {
    store: Arc<PriceStore>,
    width: BucketWidth,
    reject_empty_ranges: bool,
}

impl QueryFacade {
    pub fn new(store: Arc<PriceStore>, width: BucketWidth) -> Self {
        QueryFacade {
            store,
            width,
            reject_empty_ranges: false,
        }
    }

    /// Fail `range_lookup` with `InvalidRange` when `end <= start`
    pub fn with_strict_ranges(mut self, strict: bool) -> Self {
        self.reject_empty_ranges = strict;
        self
    }

    /// Quote stored for the bucket containing `at_secs`
    pub fn point_lookup(&self, currency: SupportedCurrency, at_secs: i64) -> Result<PriceQuote> {
        self.store.get(currency, to_instant(at_secs)?, self.width)
    }

    /// Quotes for buckets from `start_secs` (inclusive) to `end_secs` (exclusive)
    pub fn range_lookup(&self, currency: SupportedCurrency, start_secs: i64, end_secs: i64) -> Result<PriceRange> {
        if end_secs <= start_secs {
            if self.reject_empty_ranges {
                return Err(PriceError::InvalidRange(format!(
                    "end {} is not after start {}",
                    end_secs, start_secs
                )));
            }
            return Ok(PriceRange::empty());
        }
        self.store.range(
            currency,
            to_instant(start_secs)?,
            to_instant(end_secs)?,
            self.width,
        )
    }
}

fn to_instant(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| PriceError::InvalidInstant(format!("{} seconds is out of range", secs)))
}
