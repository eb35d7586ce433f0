pub mod types;
pub mod error;
pub mod data;
pub mod ingest;
pub mod query;
pub mod feed;
pub mod server;
pub mod config;
pub mod utils;
pub mod app;

pub use types::*;
pub use error::{PriceError, Result};
