//! Live transfer event sources.
//!
//! A [`TransferEventSource`] hands out a channel receiver that yields
//! `Transfer` events for a token contract as they are observed on chain.
//! The production implementation, [`LedgerEventSource`], polls the ledger
//! for new logs at a fixed interval and forwards decoded events into the
//! channel until the receiver is dropped.

use crate::{
	models::TransferEvent,
	services::{
		blockchain::LedgerClient,
		subscription::error::SubscriptionError,
	},
};
use alloy::primitives::Address;
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::{mpsc, watch};

/// Bound on the number of undelivered events buffered between the source
/// and the dispatcher.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Produces a stream of decoded transfer events for a token contract.
///
/// Setup is the only fallible step. Once `subscribe` returns a receiver,
/// errors observed while fetching later ledger activity are transient and
/// handled inside the source itself.
#[async_trait]
pub trait TransferEventSource: Send + Sync {
	/// Establishes the subscription and returns the receiving end of the
	/// event channel.
	///
	/// # Arguments
	/// * `contract` - Address of the token contract to watch
	///
	/// # Returns
	/// * `Result<mpsc::Receiver<TransferEvent>, SubscriptionError>` - Event
	///   receiver, or an error if the subscription could not be established
	async fn subscribe(
		&self,
		contract: Address,
	) -> Result<mpsc::Receiver<TransferEvent>, SubscriptionError>;
}

/// Polling event source backed by a [`LedgerClient`].
pub struct LedgerEventSource<C: LedgerClient + 'static> {
	client: Arc<C>,
	poll_interval: Duration,
	shutdown: watch::Receiver<bool>,
}

impl<C: LedgerClient + 'static> LedgerEventSource<C> {
	/// Creates a new source polling the given client at `poll_interval`.
	///
	/// The poll loop stops, closing the event channel, when `true` is sent
	/// on the shutdown channel.
	pub fn new(
		client: Arc<C>,
		poll_interval: Duration,
		shutdown: watch::Receiver<bool>,
	) -> Self {
		Self {
			client,
			poll_interval,
			shutdown,
		}
	}

	/// Background loop forwarding new transfer logs into the channel.
	///
	/// Runs until shutdown is signalled or the receiving side of the channel
	/// is dropped. Transient ledger errors are logged and the affected poll
	/// cycle is skipped so a flaky node does not terminate an established
	/// subscription.
	async fn poll_loop(
		client: Arc<C>,
		contract: Address,
		poll_interval: Duration,
		mut cursor: u64,
		tx: mpsc::Sender<TransferEvent>,
		mut shutdown: watch::Receiver<bool>,
	) {
		loop {
			tokio::select! {
				_ = tokio::time::sleep(poll_interval) => {}
				changed = shutdown.changed() => {
					// A dropped sender means no one can keep the loop
					// alive, treat it the same as an explicit shutdown.
					match changed {
						Ok(()) if !*shutdown.borrow() => continue,
						_ => {
							tracing::debug!("Shutdown signalled, stopping poll loop");
							return;
						}
					}
				}
			}

			let latest = match client.latest_block_number().await {
				Ok(latest) => latest,
				Err(e) => {
					tracing::warn!("Failed to fetch latest block, skipping poll cycle: {}", e);
					continue;
				}
			};

			if latest <= cursor {
				continue;
			}

			let events = match client.transfer_logs(contract, cursor + 1, latest).await {
				Ok(events) => events,
				Err(e) => {
					tracing::warn!(
						from_block = cursor + 1,
						to_block = latest,
						"Failed to fetch transfer logs, skipping poll cycle: {}",
						e
					);
					continue;
				}
			};

			for event in events {
				if tx.send(event).await.is_err() {
					tracing::debug!("Event receiver dropped, stopping poll loop");
					return;
				}
			}

			cursor = latest;
		}
	}
}

#[async_trait]
impl<C: LedgerClient + 'static> TransferEventSource for LedgerEventSource<C> {
	async fn subscribe(
		&self,
		contract: Address,
	) -> Result<mpsc::Receiver<TransferEvent>, SubscriptionError> {
		// Probing for the chain head both validates node connectivity and
		// anchors the polling cursor so only post-subscription activity is
		// reported.
		let start_block = self.client.latest_block_number().await.map_err(|e| {
			SubscriptionError::setup_failed(
				"Failed to fetch the latest block while establishing subscription",
				Some(e.into()),
				Some(HashMap::from([(
					"contract".to_string(),
					format!("{:#x}", contract),
				)])),
			)
		})?;

		let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

		tokio::spawn(Self::poll_loop(
			self.client.clone(),
			contract,
			self.poll_interval,
			start_block,
			tx,
			self.shutdown.clone(),
		));

		tracing::info!(
			contract = %format!("{:#x}", contract),
			start_block,
			"Transfer event subscription established"
		);

		Ok(rx)
	}
}
