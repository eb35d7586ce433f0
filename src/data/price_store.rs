/// Time-bucketed price storage on an embedded ordered key-value engine.
///
/// redb serializes write transactions internally and serves reads from
/// MVCC snapshots, so one writer and many readers share a `PriceStore`
/// through an `Arc` with no extra locking.
use chrono::{DateTime, Utc};
use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use tracing::{debug, info};

use crate::data::codec::{
    bucket_key, decode_value, encode_key, encode_value, BucketWidth, KeyLayout,
};
use crate::error::{PriceError, Result};
use crate::types::{PriceQuote, SupportedCurrency};
use crate::utils::format_epoch_secs;

const PRICES: TableDefinition<&str, &[u8]> = TableDefinition::new("prices");

pub struct PriceStore {
    db: Database,
    layout: KeyLayout,
}

impl PriceStore {
    /// Open or create a file-backed store
    pub fn open<P: AsRef<Path>>(path: P, layout: KeyLayout) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;
        info!("Opened price store at {} ({:?} keys)", path.display(), layout);
        Self::init(db, layout)
    }

    /// Non-persistent store, for tests and dry runs
    pub fn in_memory(layout: KeyLayout) -> Result<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::init(db, layout)
    }

    fn init(db: Database, layout: KeyLayout) -> Result<Self> {
        // Create the table up front so readers never see it missing
        let txn = db.begin_write()?;
        txn.open_table(PRICES)?;
        txn.commit()?;
        Ok(PriceStore { db, layout })
    }

    pub fn layout(&self) -> KeyLayout {
        self.layout
    }

    /// Write `quote` into its bucket, replacing whatever the bucket held
    pub fn put(&self, currency: SupportedCurrency, quote: &PriceQuote, width: BucketWidth) -> Result<()> {
        if quote.currency_code != currency.as_str() {
            return Err(PriceError::InvalidQuote(format!(
                "quote for {} written as {}",
                quote.currency_code, currency
            )));
        }
        if !quote.price.is_finite() || quote.price < 0.0 {
            return Err(PriceError::InvalidQuote(format!(
                "{} price {} is not a non-negative number",
                quote.currency_code, quote.price
            )));
        }

        let bucket_start = width.align_down(quote.observed_at_secs());
        let key = bucket_key(currency, bucket_start, self.layout);
        let value = encode_value(quote, bucket_start)?;

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PRICES)?;
            table.insert(key.as_str(), value.as_slice())?;
        }
        txn.commit()?;

        debug!(
            "Stored {} ({}) price {} from {}",
            key,
            format_epoch_secs(bucket_start),
            quote.price,
            quote.provider
        );
        Ok(())
    }

    /// Exact-bucket lookup; neighbouring buckets are never consulted
    pub fn get(&self, currency: SupportedCurrency, at: DateTime<Utc>, width: BucketWidth) -> Result<PriceQuote> {
        let key = encode_key(currency, at, width, self.layout);
        let txn = self.db.begin_read()?;
        let table = txn.open_table(PRICES)?;

        match table.get(key.as_str())? {
            Some(value) => decode_value(value.value()),
            None => {
                debug!("No entry for {}", key);
                Err(PriceError::NotFound {
                    currency: currency.to_string(),
                    bucket_start: width.bucket_start(at),
                })
            }
        }
    }

    /// Entries with bucket start in `[bucket(start), bucket(end))`, in key order.
    ///
    /// The returned iterator reads from a snapshot taken here; later writes
    /// are not observed.
    pub fn range(
        &self,
        currency: SupportedCurrency,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        width: BucketWidth,
    ) -> Result<PriceRange> {
        let start_key = encode_key(currency, start, width, self.layout);
        let end_key = encode_key(currency, end, width, self.layout);
        debug!("Range scan start: {}, end: {}", start_key, end_key);

        if start_key >= end_key {
            return Ok(PriceRange::empty());
        }

        let txn = self.db.begin_read()?;
        let table = txn.open_table(PRICES)?;
        let entries = table.range(start_key.as_str()..end_key.as_str())?;
        Ok(PriceRange {
            entries: Some(entries),
        })
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PRICES)?;
            table.insert(key, bytes)?;
        }
        txn.commit()?;
        Ok(())
    }
}

/// One-shot forward scan over stored quotes.
///
/// The underlying read snapshot is released when the scan is exhausted,
/// hits an error, or is dropped, whichever comes first.
pub struct PriceRange {
    entries: Option<redb::Range<'static, &'static str, &'static [u8]>>,
}

impl PriceRange {
    pub fn empty() -> Self {
        PriceRange { entries: None }
    }
}

impl Iterator for PriceRange {
    type Item = Result<PriceQuote>;

    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries.as_mut()?;
        let item = match entries.next() {
            None => {
                self.entries = None;
                return None;
            }
            Some(Err(e)) => Err(PriceError::from(e)),
            Some(Ok((_key, value))) => decode_value(value.value()),
        };
        if item.is_err() {
            // Abort the scan rather than skipping the bad record
            self.entries = None;
        }
        Some(item)
    }
}
