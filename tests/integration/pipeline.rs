//! Integration tests for the event processing pipeline.
//!
//! Exercises the full decode-filter-enrich-notify path against a mocked
//! ledger client and lettre's stub transport, with particular attention to
//! per-event error isolation.

use alloy::primitives::{address, Address, B256, U256};
use chrono::{TimeZone, Utc};
use email_address::EmailAddress;
use lettre::transport::stub::AsyncStubTransport;
use mockall::predicate::eq;
use std::{str::FromStr, sync::Arc};

use transfer_monitor::{
	models::TransferEvent,
	services::{
		blockchain::BlockChainError,
		filter::AddressFilter,
		notification::EmailNotifier,
		pipeline::{EventPipeline, PipelineError, PipelineOutcome},
	},
};

use super::mocks::MockLedgerClient;

const MONITORED: Address = address!("1111111111111111111111111111111111111111");
const OTHER: Address = address!("2222222222222222222222222222222222222222");
const STRANGER: Address = address!("3333333333333333333333333333333333333333");

fn notifier(transport: AsyncStubTransport) -> EmailNotifier<AsyncStubTransport> {
	EmailNotifier::with_transport(
		transport,
		EmailAddress::from_str("monitor@example.com").unwrap(),
		vec![EmailAddress::from_str("ops@example.com").unwrap()],
	)
}

fn transfer(from: Address, to: Address, block_number: u64) -> TransferEvent {
	TransferEvent {
		from,
		to,
		value: U256::from(10u8).pow(U256::from(18u8)),
		block_number,
		transaction_hash: B256::repeat_byte(0xab),
	}
}

fn pipeline(
	client: MockLedgerClient,
	transport: AsyncStubTransport,
) -> EventPipeline<MockLedgerClient, AsyncStubTransport> {
	EventPipeline::new(
		AddressFilter::new([MONITORED]),
		Arc::new(client),
		notifier(transport),
		"Test Token".to_string(),
	)
}

#[tokio::test]
async fn test_relevant_transfer_is_delivered() {
	let mut client = MockLedgerClient::new();
	client
		.expect_block_timestamp()
		.with(eq(19_000_000u64))
		.times(1)
		.returning(|_| Ok(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));

	let transport = AsyncStubTransport::new_ok();
	let pipeline = pipeline(client, transport.clone());

	let outcome = pipeline
		.process(&transfer(MONITORED, OTHER, 19_000_000))
		.await
		.unwrap();

	assert_eq!(outcome, PipelineOutcome::Delivered);
	assert_eq!(transport.messages().await.len(), 1);
}

#[tokio::test]
async fn test_irrelevant_transfer_is_skipped_without_enrichment() {
	// No expectations set: any ledger access would panic the mock, proving
	// the pipeline short-circuits before enrichment.
	let client = MockLedgerClient::new();
	let transport = AsyncStubTransport::new_ok();
	let pipeline = pipeline(client, transport.clone());

	let outcome = pipeline
		.process(&transfer(STRANGER, OTHER, 19_000_000))
		.await
		.unwrap();

	assert_eq!(outcome, PipelineOutcome::Skipped);
	assert!(transport.messages().await.is_empty());
}

#[tokio::test]
async fn test_block_lookup_failure_is_isolated_per_event() {
	let mut client = MockLedgerClient::new();
	client
		.expect_block_timestamp()
		.with(eq(19_000_000u64))
		.times(1)
		.returning(|_| {
			Err(BlockChainError::block_lookup_error(
				"Block not found",
				None,
				None,
			))
		});
	client
		.expect_block_timestamp()
		.with(eq(19_000_001u64))
		.times(1)
		.returning(|_| Ok(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 12).unwrap()));

	let transport = AsyncStubTransport::new_ok();
	let pipeline = pipeline(client, transport.clone());

	// The failing event, relevant on its receiving side, is logged and
	// swallowed.
	pipeline.handle(transfer(STRANGER, MONITORED, 19_000_000)).await;
	assert!(transport.messages().await.is_empty());

	// A later event still goes through.
	pipeline.handle(transfer(MONITORED, OTHER, 19_000_001)).await;
	assert_eq!(transport.messages().await.len(), 1);
}

#[tokio::test]
async fn test_delivery_failure_does_not_propagate() {
	let mut client = MockLedgerClient::new();
	client
		.expect_block_timestamp()
		.times(2)
		.returning(|_| Ok(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));

	let transport = AsyncStubTransport::new_error();
	let pipeline = pipeline(client, transport.clone());

	let result = pipeline.process(&transfer(MONITORED, OTHER, 19_000_000)).await;
	assert!(matches!(result, Err(PipelineError::Delivery(_))));

	// handle() swallows the same failure.
	pipeline.handle(transfer(MONITORED, OTHER, 19_000_000)).await;
}

#[tokio::test]
async fn test_received_transfer_is_delivered() {
	let mut client = MockLedgerClient::new();
	client
		.expect_block_timestamp()
		.times(1)
		.returning(|_| Ok(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));

	let transport = AsyncStubTransport::new_ok();
	let pipeline = pipeline(client, transport.clone());

	let outcome = pipeline
		.process(&transfer(STRANGER, MONITORED, 19_000_000))
		.await
		.unwrap();

	assert_eq!(outcome, PipelineOutcome::Delivered);
	assert_eq!(transport.messages().await.len(), 1);
}
