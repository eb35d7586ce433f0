/// Snapshot ingestion - filters feed quotes and writes them through the store
use std::sync::Arc;
use tracing::{debug, warn};

use crate::data::{BucketWidth, PriceStore};
use crate::error::Result;
use crate::types::{MarketSnapshot, SupportedCurrency};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub stored: usize,
    pub skipped: usize,
}

pub struct IngestionPipeline {
    store: Arc<PriceStore>,
    accepted: Vec<SupportedCurrency>,
}

impl IngestionPipeline {
    pub fn new(store: Arc<PriceStore>, accepted: Vec<SupportedCurrency>) -> Self {
        IngestionPipeline { store, accepted }
    }

    /// Accepts every supported currency
    pub fn with_all_currencies(store: Arc<PriceStore>) -> Self {
        Self::new(store, SupportedCurrency::all().to_vec())
    }

    fn accepts(&self, code: &str) -> Option<SupportedCurrency> {
        SupportedCurrency::from_code(code).filter(|c| self.accepted.contains(c))
    }

    /// Store every accepted quote in `snapshot`.
    ///
    /// Stops at the first failed write; quotes already written stay written.
    pub fn ingest(&self, snapshot: &MarketSnapshot, width: BucketWidth) -> Result<IngestSummary> {
        let mut summary = IngestSummary::default();

        for quote in &snapshot.quotes {
            let Some(currency) = self.accepts(&quote.currency_code) else {
                summary.skipped += 1;
                continue;
            };

            if let Err(e) = self.store.put(currency, quote, width) {
                warn!(
                    "Ingest aborted at {} after {} writes: {}",
                    quote.currency_code, summary.stored, e
                );
                return Err(e);
            }
            summary.stored += 1;
        }

        debug!(
            "Ingested snapshot: {} stored, {} skipped",
            summary.stored, summary.skipped
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::KeyLayout;
    use crate::error::PriceError;
    use crate::types::PriceQuote;
    use chrono::DateTime;

    fn width() -> BucketWidth {
        BucketWidth::from_secs(10).unwrap()
    }

    fn setup() -> (Arc<PriceStore>, IngestionPipeline) {
        let store = Arc::new(PriceStore::in_memory(KeyLayout::Compact).unwrap());
        let pipeline = IngestionPipeline::with_all_currencies(Arc::clone(&store));
        (store, pipeline)
    }

    fn at(secs: i64) -> DateTime<chrono::Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_unsupported_currencies_are_skipped() {
        let (store, pipeline) = setup();
        let snapshot = MarketSnapshot::new(vec![
            PriceQuote::new("EUR", 45000.0, 1_000_000, "BTCAVERAGE"),
            PriceQuote::new("USD", 50000.0, 1_000_000, "BTCAVERAGE"),
            PriceQuote::new("usd", 1.0, 1_000_000, "BTCAVERAGE"),
        ]);

        let summary = pipeline.ingest(&snapshot, width()).unwrap();
        assert_eq!(summary, IngestSummary { stored: 1, skipped: 2 });

        let quote = store.get(SupportedCurrency::Usd, at(1000), width()).unwrap();
        assert_eq!(quote.price, 50000.0);
    }

    #[test]
    fn test_accepted_subset() {
        let store = Arc::new(PriceStore::in_memory(KeyLayout::Compact).unwrap());
        let pipeline = IngestionPipeline::new(Arc::clone(&store), vec![SupportedCurrency::Jpy]);
        let snapshot = MarketSnapshot::new(vec![
            PriceQuote::new("USD", 50000.0, 1_000_000, "BTCAVERAGE"),
            PriceQuote::new("JPY", 5_300_000.0, 1_000_000, "BTCAVERAGE"),
        ]);

        pipeline.ingest(&snapshot, width()).unwrap();
        assert!(store.get(SupportedCurrency::Usd, at(1000), width()).is_err());
        assert!(store.get(SupportedCurrency::Jpy, at(1000), width()).is_ok());
    }

    #[test]
    fn test_reingest_is_idempotent() {
        let (store, pipeline) = setup();
        let snapshot = MarketSnapshot::new(vec![
            PriceQuote::new("USD", 50000.0, 1_000_000, "BTCAVERAGE"),
            PriceQuote::new("JPY", 5_300_000.0, 1_003_000, "BTCAVERAGE"),
        ]);

        pipeline.ingest(&snapshot, width()).unwrap();
        pipeline.ingest(&snapshot, width()).unwrap();

        let usd: Vec<_> = store
            .range(SupportedCurrency::Usd, at(0), at(5000), width())
            .unwrap()
            .collect();
        assert_eq!(usd.len(), 1);
    }

    #[test]
    fn test_first_failure_aborts_snapshot() {
        let (store, pipeline) = setup();
        let snapshot = MarketSnapshot::new(vec![
            PriceQuote::new("USD", 50000.0, 1_000_000, "BTCAVERAGE"),
            PriceQuote::new("USD", -1.0, 1_010_000, "BTCAVERAGE"),
            PriceQuote::new("JPY", 5_300_000.0, 1_000_000, "BTCAVERAGE"),
        ]);

        let err = pipeline.ingest(&snapshot, width()).unwrap_err();
        assert!(matches!(err, PriceError::InvalidQuote(_)));

        assert!(store.get(SupportedCurrency::Usd, at(1000), width()).is_ok());
        assert!(store.get(SupportedCurrency::Jpy, at(1000), width()).is_err());
    }

    #[test]
    fn test_empty_snapshot() {
        let (_store, pipeline) = setup();
        let summary = pipeline.ingest(&MarketSnapshot::default(), width()).unwrap();
        assert_eq!(summary, IngestSummary::default());
    }
}
