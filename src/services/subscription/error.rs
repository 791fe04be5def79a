//! Subscription error types.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Represents errors that can occur while establishing the event subscription
#[derive(ThisError, Debug)]
pub enum SubscriptionError {
	/// Establishing the live event subscription failed
	#[error("Subscription setup error: {0}")]
	SetupFailed(Box<ErrorContext>),
}

impl SubscriptionError {
	// Setup failed error
	pub fn setup_failed(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SetupFailed(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}
}

impl TraceableError for SubscriptionError {
	fn trace_id(&self) -> String {
		match self {
			Self::SetupFailed(ctx) => ctx.trace_id.clone(),
		}
	}
}
