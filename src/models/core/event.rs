//! Transfer event models.
//!
//! `TransferLog` is the raw JSON-RPC log entry as returned by `eth_getLogs`;
//! `TransferEvent` is the decoded form the pipeline operates on. Events are
//! ephemeral: one per ledger event, dropped after processing.

use alloy::primitives::{b256, Address, Bytes, B256, U256, U64};
use serde::Deserialize;
use thiserror::Error;

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_EVENT_SIGNATURE: B256 =
	b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

/// Raw log entry for a contract event, as returned by `eth_getLogs`
#[derive(Debug, Clone, Deserialize)]
pub struct TransferLog {
	/// Emitting contract address
	pub address: Address,
	/// Event topics; for Transfer: signature, indexed `from`, indexed `to`
	pub topics: Vec<B256>,
	/// ABI-encoded non-indexed parameters (the transfer value)
	pub data: Bytes,
	/// Block the log was included in
	#[serde(rename = "blockNumber")]
	pub block_number: U64,
	/// Hash of the transaction that emitted the log
	#[serde(rename = "transactionHash")]
	pub transaction_hash: B256,
}

/// Errors raised while decoding a raw log into a [`TransferEvent`]
#[derive(Debug, Error, PartialEq)]
pub enum LogDecodeError {
	#[error("Log topic0 does not match the Transfer event signature")]
	SignatureMismatch,

	#[error("Expected 3 topics for a Transfer log, got {0}")]
	UnexpectedTopicCount(usize),

	#[error("Transfer log data too short: expected 32 bytes, got {0}")]
	InvalidData(usize),
}

/// A decoded ERC-20 Transfer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
	/// Sending address
	pub from: Address,
	/// Receiving address
	pub to: Address,
	/// Transferred amount in the token's smallest unit
	pub value: U256,
	/// Block the transfer was included in
	pub block_number: u64,
	/// Hash of the transaction carrying the transfer
	pub transaction_hash: B256,
}

impl TryFrom<TransferLog> for TransferEvent {
	type Error = LogDecodeError;

	fn try_from(log: TransferLog) -> Result<Self, Self::Error> {
		if log.topics.len() != 3 {
			return Err(LogDecodeError::UnexpectedTopicCount(log.topics.len()));
		}
		if log.topics[0] != TRANSFER_EVENT_SIGNATURE {
			return Err(LogDecodeError::SignatureMismatch);
		}
		if log.data.len() < 32 {
			return Err(LogDecodeError::InvalidData(log.data.len()));
		}

		Ok(Self {
			from: Address::from_word(log.topics[1]),
			to: Address::from_word(log.topics[2]),
			value: U256::from_be_slice(&log.data[..32]),
			block_number: log.block_number.to::<u64>(),
			transaction_hash: log.transaction_hash,
		})
	}
}
