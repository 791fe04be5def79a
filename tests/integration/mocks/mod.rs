//! Mock implementations for testing purposes.
//!
//! This module contains mock implementations of traits used throughout the
//! application, primarily for testing. It includes mocks for:
//! - The ledger client
//! - The transfer event source
//!
//! The mocks are implemented using the `mockall` crate.

use alloy::primitives::Address;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use tokio::sync::mpsc;

use transfer_monitor::{
	models::TransferEvent,
	services::{
		blockchain::{BlockChainError, LedgerClient},
		subscription::{SubscriptionError, TransferEventSource},
	},
};

mock! {
	/// Mock implementation of the ledger client.
	///
	/// Allows testing pipeline and subscription behavior by simulating node
	/// responses without any network access.
	pub LedgerClient {}

	#[async_trait]
	impl LedgerClient for LedgerClient {
		async fn latest_block_number(&self) -> Result<u64, BlockChainError>;
		async fn block_timestamp(
			&self,
			block_number: u64,
		) -> Result<DateTime<Utc>, BlockChainError>;
		async fn token_name(&self, contract: Address) -> Result<String, BlockChainError>;
		async fn transfer_logs(
			&self,
			contract: Address,
			from_block: u64,
			to_block: u64,
		) -> Result<Vec<TransferEvent>, BlockChainError>;
	}
}

mock! {
	/// Mock implementation of the transfer event source.
	///
	/// Allows driving the subscription manager through its setup protocol
	/// with scripted successes and failures.
	pub TransferEventSource {}

	#[async_trait]
	impl TransferEventSource for TransferEventSource {
		async fn subscribe(
			&self,
			contract: Address,
		) -> Result<mpsc::Receiver<TransferEvent>, SubscriptionError>;
	}
}
