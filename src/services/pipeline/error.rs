//! Pipeline error types.

use thiserror::Error as ThisError;

use crate::{
	services::{blockchain::BlockChainError, notification::NotificationError},
	utils::logging::error::TraceableError,
};

/// Failure of a single event's journey through the pipeline.
///
/// These errors stop exactly one event: the pipeline logs them at its
/// isolation boundary and keeps the subscription alive.
#[derive(ThisError, Debug)]
pub enum PipelineError {
	/// Block timestamp resolution failed for the event's block
	#[error("{0}")]
	BlockLookup(#[from] BlockChainError),

	/// Notification delivery failed for the event's payload
	#[error("{0}")]
	Delivery(#[from] NotificationError),
}

impl TraceableError for PipelineError {
	fn trace_id(&self) -> String {
		match self {
			Self::BlockLookup(e) => e.trace_id(),
			Self::Delivery(e) => e.trace_id(),
		}
	}
}
