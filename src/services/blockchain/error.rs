//! Ledger client error types.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Represents errors that can occur during ledger client operations
#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// Errors related to establishing a connection to the ledger node
	#[error("Connection error: {0}")]
	ConnectionError(Box<ErrorContext>),

	/// Errors related to malformed requests or failed RPC calls
	#[error("Request error: {0}")]
	RequestError(Box<ErrorContext>),

	/// Errors related to resolving a block (e.g. pruned history, transient RPC failure)
	#[error("Block lookup error: {0}")]
	BlockLookupError(Box<ErrorContext>),
}

impl BlockChainError {
	// Connection error
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Request error
	pub fn request_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Block lookup error
	pub fn block_lookup_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::BlockLookupError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConnectionError(ctx) => ctx.trace_id.clone(),
			Self::RequestError(ctx) => ctx.trace_id.clone(),
			Self::BlockLookupError(ctx) => ctx.trace_id.clone(),
		}
	}
}
