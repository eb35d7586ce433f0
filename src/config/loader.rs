/// Configuration loading from TOML file
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::{PriceError, Result};
use crate::types::Config;
use crate::utils::parse_duration;

/// Load and validate the config; a missing file means all defaults.
/// The fallback is not logged here, callers report it.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        let config = Config::default();
        validate_config(&config)?;
        return Ok(config);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| PriceError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| PriceError::Config(format!("Failed to parse config: {}", e)))?;

    validate_config(&config)?;

    Ok(config)
}

/// Ingestion cadence as a `Duration`
pub fn ingest_interval(config: &Config) -> Result<Duration> {
    let interval = parse_duration(&config.ingest.interval).ok_or_else(|| {
        PriceError::Config(format!("Invalid ingest.interval: {:?}", config.ingest.interval))
    })?;
    if interval.is_zero() {
        return Err(PriceError::Config("ingest.interval must be > 0".to_string()));
    }
    Ok(interval)
}

pub fn server_addr(config: &Config) -> Result<SocketAddr> {
    config
        .server
        .addr
        .parse()
        .map_err(|e| PriceError::Config(format!("Invalid server.addr {:?}: {}", config.server.addr, e)))
}

fn validate_config(config: &Config) -> Result<()> {
    if config.store.path.is_empty() {
        return Err(PriceError::Config("store.path is empty".to_string()));
    }

    if config.ingest.currencies.is_empty() {
        return Err(PriceError::Config("ingest.currencies is empty".to_string()));
    }

    if config.ingest.request_timeout_secs == 0 {
        return Err(PriceError::Config("ingest.request_timeout_secs must be > 0".to_string()));
    }

    ingest_interval(config)?;
    server_addr(config)?;

    Ok(())
}
