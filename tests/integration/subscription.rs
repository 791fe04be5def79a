//! Integration tests for subscription setup and event dispatch.
//!
//! Drives the subscription manager through its retry protocol with a mocked
//! event source, using paused tokio time so the fixed waits between attempts
//! are observable without real delays.

use alloy::primitives::{address, Address, B256, U256};
use chrono::{TimeZone, Utc};
use email_address::EmailAddress;
use lettre::transport::stub::AsyncStubTransport;
use mockall::Sequence;
use std::{str::FromStr, sync::Arc, time::Duration};
use tokio::sync::{mpsc, watch};

use transfer_monitor::{
	models::TransferEvent,
	services::{
		filter::AddressFilter,
		notification::EmailNotifier,
		pipeline::EventPipeline,
		subscription::{
			dispatch_events, LedgerEventSource, SubscriptionError, SubscriptionManager,
			SubscriptionState, TransferEventSource, MAX_SETUP_ATTEMPTS, SETUP_RETRY_INTERVAL,
		},
	},
};

use super::mocks::{MockLedgerClient, MockTransferEventSource};

const CONTRACT: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
const MONITORED: Address = address!("1111111111111111111111111111111111111111");

fn setup_error() -> SubscriptionError {
	SubscriptionError::setup_failed("node unreachable", None, None)
}

fn empty_receiver() -> mpsc::Receiver<TransferEvent> {
	let (_tx, rx) = mpsc::channel(1);
	rx
}

#[tokio::test(start_paused = true)]
async fn test_setup_succeeds_on_first_attempt() {
	let mut source = MockTransferEventSource::new();
	source
		.expect_subscribe()
		.times(1)
		.returning(|_| Ok(empty_receiver()));

	let mut manager = SubscriptionManager::new(Arc::new(source));
	assert_eq!(manager.state(), SubscriptionState::Idle);

	let started = tokio::time::Instant::now();
	let result = manager.start(CONTRACT).await;

	assert!(result.is_ok());
	assert_eq!(manager.state(), SubscriptionState::Active);
	assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_setup_retries_with_fixed_wait_then_succeeds() {
	let mut seq = Sequence::new();
	let mut source = MockTransferEventSource::new();
	source
		.expect_subscribe()
		.times(2)
		.in_sequence(&mut seq)
		.returning(|_| Err(setup_error()));
	source
		.expect_subscribe()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(empty_receiver()));

	let mut manager = SubscriptionManager::new(Arc::new(source));

	let started = tokio::time::Instant::now();
	let result = manager.start(CONTRACT).await;

	assert!(result.is_ok());
	assert_eq!(manager.state(), SubscriptionState::Active);
	// Two failures mean exactly two fixed waits before the third attempt.
	assert_eq!(started.elapsed(), 2 * SETUP_RETRY_INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn test_setup_gives_up_after_attempt_budget() {
	let mut source = MockTransferEventSource::new();
	source
		.expect_subscribe()
		.times(MAX_SETUP_ATTEMPTS as usize)
		.returning(|_| Err(setup_error()));

	let mut manager = SubscriptionManager::new(Arc::new(source));

	let started = tokio::time::Instant::now();
	let result = manager.start(CONTRACT).await;

	assert!(result.is_err());
	assert_eq!(manager.state(), SubscriptionState::Failed);
	// No wait after the final failure, only between attempts.
	assert_eq!(
		started.elapsed(),
		(MAX_SETUP_ATTEMPTS - 1) * SETUP_RETRY_INTERVAL
	);
}

#[tokio::test(start_paused = true)]
async fn test_custom_retry_policy_is_honored() {
	let mut source = MockTransferEventSource::new();
	source
		.expect_subscribe()
		.times(5)
		.returning(|_| Err(setup_error()));

	let mut manager =
		SubscriptionManager::with_retry_policy(Arc::new(source), 5, Duration::from_secs(5));

	let started = tokio::time::Instant::now();
	let result = manager.start(CONTRACT).await;

	assert!(result.is_err());
	assert_eq!(started.elapsed(), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn test_poll_loop_stops_on_shutdown_signal() {
	let mut client = MockLedgerClient::new();
	// Only the setup probe; the loop must not poll again after shutdown.
	client
		.expect_latest_block_number()
		.times(1)
		.returning(|| Ok(19_000_000));

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let source = LedgerEventSource::new(Arc::new(client), Duration::from_secs(12), shutdown_rx);

	let mut receiver = source.subscribe(CONTRACT).await.unwrap();
	shutdown_tx.send(true).unwrap();

	// The loop exits and drops its sender, closing the event channel.
	assert!(receiver.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_poll_loop_stops_when_shutdown_sender_dropped() {
	let mut client = MockLedgerClient::new();
	client
		.expect_latest_block_number()
		.times(1)
		.returning(|| Ok(19_000_000));

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let source = LedgerEventSource::new(Arc::new(client), Duration::from_secs(12), shutdown_rx);

	let mut receiver = source.subscribe(CONTRACT).await.unwrap();

	// A dropped sender without an explicit signal must also stop the loop
	// instead of leaving it spinning without ever reaching the poll timer.
	drop(shutdown_tx);
	assert!(receiver.recv().await.is_none());
}

#[tokio::test]
async fn test_dispatch_processes_events_and_drains_on_close() {
	let mut client = MockLedgerClient::new();
	client
		.expect_block_timestamp()
		.times(2)
		.returning(|_| Ok(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));

	let transport = AsyncStubTransport::new_ok();
	let pipeline = Arc::new(EventPipeline::new(
		AddressFilter::new([MONITORED]),
		Arc::new(client),
		EmailNotifier::with_transport(
			transport.clone(),
			EmailAddress::from_str("monitor@example.com").unwrap(),
			vec![EmailAddress::from_str("ops@example.com").unwrap()],
		),
		"Test Token".to_string(),
	));

	let (tx, rx) = mpsc::channel(16);
	for block_number in [19_000_000u64, 19_000_001] {
		tx.send(TransferEvent {
			from: MONITORED,
			to: CONTRACT,
			value: U256::from(1u8),
			block_number,
			transaction_hash: B256::repeat_byte(0xcd),
		})
		.await
		.unwrap();
	}
	drop(tx);

	// Returns only after the channel closes and in-flight handlers finish.
	dispatch_events(rx, pipeline).await;
	assert_eq!(transport.messages().await.len(), 2);
}
