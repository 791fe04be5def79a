//! Per-event processing pipeline.
//!
//! Each incoming transfer flows through filter → block-time resolution →
//! enrichment → delivery. [`EventPipeline::handle`] is the isolation
//! boundary: whatever goes wrong inside is logged with the event's context
//! and never propagated, so one malformed or unlucky event cannot stop
//! monitoring of subsequent events.

use alloy::primitives::Address;
use chrono::{DateTime, SecondsFormat, Utc};
use lettre::AsyncTransport;
use std::{error::Error as StdError, sync::Arc};
use tracing::{debug, error, info};

use crate::{
	models::{Decision, NotificationPayload, TransferDirection, TransferEvent},
	services::{
		blockchain::LedgerClient,
		filter::AddressFilter,
		notification::EmailNotifier,
		pipeline::error::PipelineError,
	},
	utils::parsing::format_token_units,
};

/// Fixed decimal precision of the monitored token's smallest unit
pub const TOKEN_DECIMALS: u8 = 18;

/// What the pipeline did with one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
	/// The event did not involve a monitored address
	Skipped,
	/// A notification was delivered for the event
	Delivered,
}

/// Builds the notification payload for a relevant transfer.
///
/// Pure composition: the caller supplies the token name and the resolved
/// block timestamp. The amount is converted from smallest units with exact
/// integer arithmetic.
pub fn enrich(
	event: &TransferEvent,
	watched_address: Address,
	direction: TransferDirection,
	token_name: &str,
	timestamp: DateTime<Utc>,
) -> NotificationPayload {
	NotificationPayload {
		token: token_name.to_string(),
		address: format!("{:#x}", watched_address),
		action: direction.as_str().to_string(),
		amount: format_token_units(event.value, TOKEN_DECIMALS),
		transaction_hash: format!("{:#x}", event.transaction_hash),
		block_number: event.block_number,
		timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
	}
}

/// Composition of filter, block-time resolution, enrichment and delivery
pub struct EventPipeline<C, T>
where
	C: LedgerClient,
	T: AsyncTransport + Send + Sync,
{
	filter: AddressFilter,
	client: Arc<C>,
	notifier: EmailNotifier<T>,
	token_name: String,
}

impl<C, T> EventPipeline<C, T>
where
	C: LedgerClient,
	T: AsyncTransport + Send + Sync,
	T::Ok: Send + Sync,
	T::Error: StdError + Send + Sync + 'static,
{
	/// Creates a new pipeline.
	///
	/// # Arguments
	/// * `filter` - Monitored-address filter
	/// * `client` - Ledger client used to resolve block timestamps
	/// * `notifier` - Notification sink
	/// * `token_name` - Display name of the monitored token (read once at startup)
	pub fn new(
		filter: AddressFilter,
		client: Arc<C>,
		notifier: EmailNotifier<T>,
		token_name: String,
	) -> Self {
		Self {
			filter,
			client,
			notifier,
			token_name,
		}
	}

	/// Handles one raw transfer event, swallowing any per-event failure.
	///
	/// This is the pipeline's resilience mechanism: errors are logged with
	/// the triggering transaction hash and never reach the subscription
	/// dispatcher.
	pub async fn handle(&self, event: TransferEvent) {
		let transaction_hash = format!("{:#x}", event.transaction_hash);

		match self.process(&event).await {
			Ok(PipelineOutcome::Delivered) => {
				info!(
					transaction_hash = %transaction_hash,
					block_number = event.block_number,
					"Notification sent for transfer"
				);
			}
			Ok(PipelineOutcome::Skipped) => {
				debug!(
					transaction_hash = %transaction_hash,
					"Transfer does not involve a monitored address"
				);
			}
			Err(e) => {
				error!(
					transaction_hash = %transaction_hash,
					block_number = event.block_number,
					error = %e,
					"Error processing transfer event"
				);
			}
		}
	}

	/// Runs one event through the pipeline stages, propagating failures.
	///
	/// Exposed separately from [`handle`](Self::handle) so the error paths
	/// stay observable in tests.
	pub async fn process(&self, event: &TransferEvent) -> Result<PipelineOutcome, PipelineError> {
		let (watched_address, direction) = match self.filter.evaluate(event.from, event.to) {
			Decision::NotRelevant => return Ok(PipelineOutcome::Skipped),
			Decision::Relevant {
				watched_address,
				direction,
			} => (watched_address, direction),
		};

		let timestamp = self.client.block_timestamp(event.block_number).await?;

		let payload = enrich(event, watched_address, direction, &self.token_name, timestamp);

		self.notifier.notify(&payload).await?;

		Ok(PipelineOutcome::Delivered)
	}
}
