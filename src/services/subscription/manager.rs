//! Subscription lifecycle management.
//!
//! The [`SubscriptionManager`] drives a [`TransferEventSource`] through its
//! setup protocol: a bounded number of attempts separated by a fixed wait,
//! tracking the lifecycle state throughout. Once established, the event
//! stream is handed to [`dispatch_events`], which fans each incoming event out
//! to its own processing task.

use crate::{
	models::TransferEvent,
	services::{
		blockchain::LedgerClient,
		pipeline::EventPipeline,
		subscription::{error::SubscriptionError, source::TransferEventSource},
	},
};
use alloy::primitives::Address;
use lettre::AsyncTransport;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinSet};

/// Number of times subscription setup is attempted before giving up.
pub const MAX_SETUP_ATTEMPTS: u32 = 3;

/// Fixed wait between consecutive setup attempts.
pub const SETUP_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// Lifecycle state of the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
	/// No setup attempt has been made yet
	Idle,
	/// Setup attempt `attempt` (1-based) is in progress
	Attempting { attempt: u32 },
	/// The subscription is established and delivering events
	Active,
	/// All setup attempts were exhausted without success
	Failed,
}

/// Establishes and supervises the transfer event subscription.
pub struct SubscriptionManager<S: TransferEventSource> {
	source: Arc<S>,
	max_attempts: u32,
	retry_interval: Duration,
	state: SubscriptionState,
}

impl<S: TransferEventSource> SubscriptionManager<S> {
	/// Creates a manager with the default setup retry policy.
	pub fn new(source: Arc<S>) -> Self {
		Self::with_retry_policy(source, MAX_SETUP_ATTEMPTS, SETUP_RETRY_INTERVAL)
	}

	/// Creates a manager with an explicit setup retry policy.
	pub fn with_retry_policy(
		source: Arc<S>,
		max_attempts: u32,
		retry_interval: Duration,
	) -> Self {
		Self {
			source,
			max_attempts,
			retry_interval,
			state: SubscriptionState::Idle,
		}
	}

	/// Returns the current lifecycle state.
	pub fn state(&self) -> SubscriptionState {
		self.state
	}

	/// Runs the setup protocol until the subscription is established or the
	/// attempt budget is exhausted.
	///
	/// Each failed attempt is followed by a fixed wait before the next one.
	/// On success the manager transitions to `Active` and returns the event
	/// receiver; after the final failure it transitions to `Failed` and
	/// returns the terminal error.
	pub async fn start(
		&mut self,
		contract: Address,
	) -> Result<mpsc::Receiver<TransferEvent>, SubscriptionError> {
		let mut attempt = 0;
		loop {
			attempt += 1;
			self.state = SubscriptionState::Attempting { attempt };
			tracing::info!(
				attempt,
				max_attempts = self.max_attempts,
				"Attempting subscription setup"
			);

			match self.source.subscribe(contract).await {
				Ok(receiver) => {
					self.state = SubscriptionState::Active;
					tracing::info!(attempt, "Subscription active");
					return Ok(receiver);
				}
				Err(e) if attempt >= self.max_attempts => {
					self.state = SubscriptionState::Failed;
					return Err(SubscriptionError::setup_failed(
						format!(
							"Subscription setup failed after {} attempts",
							attempt
						),
						Some(Box::new(e)),
						Some(HashMap::from([(
							"contract".to_string(),
							format!("{:#x}", contract),
						)])),
					));
				}
				Err(e) => {
					tracing::warn!(
						attempt,
						retry_in_secs = self.retry_interval.as_secs(),
						"Subscription setup attempt failed: {}",
						e
					);
					tokio::time::sleep(self.retry_interval).await;
				}
			}
		}
	}
}

/// Forwards each received event to its own processing task.
///
/// Events are processed concurrently and independently: a failure inside one
/// handler never affects another. Returns once the sending side of the
/// channel has closed and all in-flight handlers have finished.
pub async fn dispatch_events<C, T>(
	mut receiver: mpsc::Receiver<TransferEvent>,
	pipeline: Arc<EventPipeline<C, T>>,
) where
	C: LedgerClient + 'static,
	T: AsyncTransport + Send + Sync + 'static,
	T::Ok: Send + Sync,
	T::Error: std::error::Error + Send + Sync + 'static,
{
	let mut handlers = JoinSet::new();
	while let Some(event) = receiver.recv().await {
		let pipeline = pipeline.clone();
		handlers.spawn(async move {
			pipeline.handle(event).await;
		});
		// Reap completed handlers without blocking the dispatch loop.
		while handlers.try_join_next().is_some() {}
	}

	// Channel closed, drain the in-flight handlers before returning.
	while handlers.join_next().await.is_some() {}
	tracing::debug!("Event dispatch loop finished");
}
