/// Centralized error types for the price store
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    // Input Errors
    #[error("Invalid bucket width: {0}")]
    InvalidWidth(String),

    #[error("Invalid instant: {0}")]
    InvalidInstant(String),

    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    /// Only returned when strict range validation is enabled
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    // Lookup Errors
    #[error("No price stored for {currency} at bucket {bucket_start}")]
    NotFound { currency: String, bucket_start: i64 },

    // Data Errors
    #[error("Decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Malformed key: {0}")]
    MalformedKey(String),

    // Storage Errors
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    // Feed Errors
    #[error("Price feed unavailable: {0}")]
    FeedUnavailable(#[from] reqwest::Error),

    // Configuration Errors
    #[error("Configuration error: {0}")]
    Config(String),

    // File I/O Errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, PriceError>;

macro_rules! storage_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for PriceError {
                fn from(e: $ty) -> Self {
                    PriceError::StorageUnavailable(e.to_string())
                }
            }
        )+
    };
}

storage_error!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl PriceError {
    /// Errors a later ingestion cycle may not hit again
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PriceError::FeedUnavailable(_)
                | PriceError::StorageUnavailable(_)
                | PriceError::InvalidQuote(_)
        )
    }

    /// Get error code for logging/monitoring
    pub fn error_code(&self) -> &str {
        match self {
            PriceError::InvalidWidth(_) => "INPUT_001",
            PriceError::InvalidInstant(_) => "INPUT_002",
            PriceError::InvalidQuote(_) => "INPUT_003",
            PriceError::InvalidRange(_) => "INPUT_004",
            PriceError::UnsupportedCurrency(_) => "INPUT_005",
            PriceError::NotFound { .. } => "LOOKUP_001",
            PriceError::Decode(_) => "DATA_001",
            PriceError::MalformedKey(_) => "DATA_002",
            PriceError::StorageUnavailable(_) => "STORE_001",
            PriceError::FeedUnavailable(_) => "FEED_001",
            PriceError::Config(_) => "CFG_001",
            PriceError::Io(_) => "FILE_001",
            PriceError::Internal(_) => "INT_001",
        }
    }
}
