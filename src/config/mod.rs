pub mod loader;

pub use loader::{ingest_interval, load_config, parse_config, server_addr};
