//! Configuration error types.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Represents errors that can occur during configuration loading and validation
#[derive(ThisError, Debug)]
pub enum ConfigError {
	/// Errors related to invalid configuration values
	#[error("Validation error: {0}")]
	ValidationError(Box<ErrorContext>),

	/// Errors related to malformed configuration files
	#[error("Parse error: {0}")]
	ParseError(Box<ErrorContext>),

	/// Errors related to reading configuration files
	#[error("File error: {0}")]
	FileError(Box<ErrorContext>),
}

impl ConfigError {
	// Validation error
	pub fn validation_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Parse error
	pub fn parse_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// File error
	pub fn file_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::FileError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}
}

impl TraceableError for ConfigError {
	fn trace_id(&self) -> String {
		match self {
			Self::ValidationError(ctx) => ctx.trace_id.clone(),
			Self::ParseError(ctx) => ctx.trace_id.clone(),
			Self::FileError(ctx) => ctx.trace_id.clone(),
		}
	}
}
