//! Per-event processing pipeline.

mod error;
mod service;

pub use error::PipelineError;
pub use service::{enrich, EventPipeline, PipelineOutcome, TOKEN_DECIMALS};
