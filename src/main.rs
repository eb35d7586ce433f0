/// Main entry point for the price server
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use bitprice::{app::PriceServerApp, config::load_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| "config.toml".to_string());

    let config = load_config(&config_path)?;

    // Initialize logging; RUST_LOG wins over the config file
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.effective_log_level())),
        )
        .init();

    if !Path::new(&config_path).exists() {
        warn!("Config file {} not found - using defaults", config_path);
    }

    let app = PriceServerApp::new(config)?;

    app.run().await?;

    Ok(())
}
