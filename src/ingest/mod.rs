pub mod pipeline;
pub mod scheduler;

pub use pipeline::{IngestSummary, IngestionPipeline};
pub use scheduler::IngestScheduler;
