/// Wires the store, ingestion scheduler and HTTP service into one process
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::{ingest_interval, server_addr};
use crate::data::PriceStore;
use crate::error::Result;
use crate::feed::BisqClient;
use crate::ingest::{IngestScheduler, IngestionPipeline};
use crate::query::QueryFacade;
use crate::server::{self, AppState};
use crate::types::Config;

/// Application state
pub struct PriceServerApp {
    config: Arc<Config>,
    store: Arc<PriceStore>,
    scheduler: Arc<IngestScheduler<BisqClient>>,
    facade: Arc<QueryFacade>,
}

impl PriceServerApp {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        info!("Starting price server...");

        let store = Arc::new(PriceStore::open(&config.store.path, config.store.key_layout)?);

        let width = config.store.bucket_width;
        let pipeline = Arc::new(IngestionPipeline::new(
            Arc::clone(&store),
            config.ingest.currencies.clone(),
        ));
        let client = Arc::new(BisqClient::new(
            config.ingest.feed_url.clone(),
            Duration::from_secs(config.ingest.request_timeout_secs),
        )?);
        info!("Ingesting from {} every {}", config.ingest.feed_url, config.ingest.interval);
        let scheduler = Arc::new(IngestScheduler::new(
            client,
            pipeline,
            width,
            ingest_interval(&config)?,
        ));

        let facade = Arc::new(
            QueryFacade::new(Arc::clone(&store), width)
                .with_strict_ranges(config.query.reject_empty_ranges),
        );

        Ok(PriceServerApp {
            config,
            store,
            scheduler,
            facade,
        })
    }

    /// Serve and ingest until Ctrl+C, or until the server fails
    pub async fn run(&self) -> Result<()> {
        let addr = server_addr(&self.config)?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        self.setup_shutdown_handler(shutdown_tx.clone());

        let scheduler = Arc::clone(&self.scheduler);
        let ingest_rx = shutdown_rx.clone();
        let ingest_task = tokio::spawn(async move { scheduler.run(ingest_rx).await });

        let served = server::serve(addr, AppState::new(Arc::clone(&self.facade)), shutdown_rx).await;
        if let Err(e) = &served {
            error!("[{}] Server on {} failed: {} - stopping ingestion", e.error_code(), addr, e);
            let _ = shutdown_tx.send(true);
        }

        if let Err(e) = ingest_task.await {
            error!("Ingestion task ended abnormally: {}", e);
        }
        served?;

        info!(
            "Shutdown complete ({:?} keys at {})",
            self.store.layout(),
            self.config.store.path
        );
        Ok(())
    }

    /// Setup graceful shutdown handler
    fn setup_shutdown_handler(&self, shutdown: watch::Sender<bool>) {
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                // Keep the sender alive so the server keeps running
                std::future::pending::<()>().await;
            }
            info!("Ctrl+C received - initiating graceful shutdown");
            let _ = shutdown.send(true);
        });
    }
}
