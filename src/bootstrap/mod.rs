//! Bootstrap module for initializing services.
//!
//! Wires the configured transport, ledger client, address filter, email
//! notifier and event pipeline together and prepares the subscription
//! manager that feeds the pipeline.
//!
//! # Services
//! - `EvmLedgerClient`: JSON-RPC access to the configured node
//! - `AddressFilter`: monitored address matching
//! - `EmailNotifier`: SMTP notification delivery
//! - `EventPipeline`: per-event enrichment and delivery
//! - `SubscriptionManager`: subscription setup and supervision

use std::{error::Error, sync::Arc, time::Duration};

use lettre::{AsyncSmtpTransport, Tokio1Executor};
use tokio::sync::watch;

use crate::{
	models::AppConfig,
	services::{
		blockchain::{BlockChainError, EvmLedgerClient, HttpTransport, LedgerClient},
		filter::AddressFilter,
		notification::EmailNotifier,
		pipeline::EventPipeline,
		subscription::{LedgerEventSource, SubscriptionManager},
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Event pipeline delivering over SMTP, as assembled in production.
pub type SmtpEventPipeline =
	EventPipeline<EvmLedgerClient, AsyncSmtpTransport<Tokio1Executor>>;

/// Fully wired services, ready for the subscription to be started.
pub struct MonitorServices {
	/// Per-event processing pipeline
	pub pipeline: Arc<SmtpEventPipeline>,
	/// Subscription manager for the configured token contract
	pub manager: SubscriptionManager<LedgerEventSource<EvmLedgerClient>>,
	/// Signals the event source to stop polling and close the event channel
	pub shutdown_tx: watch::Sender<bool>,
}

/// Initializes all required services for the transfer monitor.
///
/// Connects to the configured node, resolves the token's display name once,
/// and assembles the filter, notifier and pipeline around it.
///
/// # Errors
/// Returns an error if the node is unreachable, the token name cannot be
/// resolved, or the SMTP transport cannot be built from the configuration.
pub async fn initialize_services(config: &AppConfig) -> Result<MonitorServices> {
	let transport = Arc::new(HttpTransport::new(&config.rpc_url).await.map_err(|e| {
		BlockChainError::connection_error(
			format!("Failed to connect to RPC endpoint {}", config.rpc_url),
			Some(e.into()),
			None,
		)
	})?);
	let client = Arc::new(EvmLedgerClient::new(transport));

	// The token name is immutable contract metadata, read it once here
	// instead of on every notification.
	let token_name = client.token_name(config.token_address).await?;
	tracing::info!(
		token = %token_name,
		contract = %format!("{:#x}", config.token_address),
		"Resolved monitored token"
	);

	let filter = AddressFilter::new(config.monitored_addresses.iter().copied());
	let notifier = EmailNotifier::from_settings(&config.notifications)?;
	let pipeline = Arc::new(EventPipeline::new(
		filter,
		client.clone(),
		notifier,
		token_name,
	));

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let source = Arc::new(LedgerEventSource::new(
		client,
		Duration::from_secs(config.poll_interval_secs),
		shutdown_rx,
	));
	let manager = SubscriptionManager::new(source);

	Ok(MonitorServices {
		pipeline,
		manager,
		shutdown_tx,
	})
}
