/// Periodic ingestion trigger
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::data::BucketWidth;
use crate::error::{PriceError, Result};
use crate::feed::SnapshotSource;
use crate::ingest::{IngestSummary, IngestionPipeline};

pub struct IngestScheduler<S> {
    source: Arc<S>,
    pipeline: Arc<IngestionPipeline>,
    width: BucketWidth,
    interval: Duration,
}

impl<S: SnapshotSource + 'static> IngestScheduler<S> {
    pub fn new(
        source: Arc<S>,
        pipeline: Arc<IngestionPipeline>,
        width: BucketWidth,
        interval: Duration,
    ) -> Self {
        IngestScheduler {
            source,
            pipeline,
            width,
            interval,
        }
    }

    /// Fetch one snapshot and ingest it
    pub async fn run_cycle(&self) -> Result<IngestSummary> {
        let snapshot = self.source.fetch_snapshot().await?;

        let pipeline = Arc::clone(&self.pipeline);
        let width = self.width;
        tokio::task::spawn_blocking(move || pipeline.ingest(&snapshot, width))
            .await
            .map_err(|e| PriceError::Internal(format!("ingest task failed: {}", e)))?
    }

    /// Run cycles on the configured cadence until `shutdown` flips to true.
    ///
    /// A failed cycle is logged and the next tick proceeds as normal.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Ingestion scheduler started (every {:?}, bucket {})", self.interval, self.width);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    // Sender dropped counts as shutdown
                    if changed.is_err() {
                        break;
                    }
                }
            }
            if *shutdown.borrow() {
                break;
            }

            match self.run_cycle().await {
                Ok(summary) => {
                    info!("Ingestion cycle: {} stored, {} skipped", summary.stored, summary.skipped)
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Ingestion cycle failed: {} ({}) - waiting for next cycle", e, e.error_code())
                }
                Err(e) => error!("Ingestion cycle failed: {} ({})", e, e.error_code()),
            }
        }

        info!("Ingestion scheduler stopped");
    }
}
