//! Notification error types and handling.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Represents errors that can occur during notification operations
#[derive(ThisError, Debug)]
pub enum NotificationError {
	/// Errors related to invalid notifier configuration
	#[error("Config error: {0}")]
	ConfigError(Box<ErrorContext>),

	/// Error when delivering a notification fails (e.g. SMTP failure, message build error)
	#[error("Notification failed: {0}")]
	NotifyFailed(Box<ErrorContext>),
}

impl NotificationError {
	// Config error
	pub fn config_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConfigError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	// Notify failed error
	pub fn notify_failed(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotifyFailed(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}
}

impl TraceableError for NotificationError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConfigError(ctx) => ctx.trace_id.clone(),
			Self::NotifyFailed(ctx) => ctx.trace_id.clone(),
		}
	}
}
