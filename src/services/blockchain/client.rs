//! Core ledger client interface and its EVM implementation.
//!
//! The [`LedgerClient`] trait is the capability boundary between the pipeline
//! and the chain: everything the monitor needs from a node (block numbers,
//! block timestamps, the token's display name, transfer logs) goes through it,
//! so tests can substitute a mock without any network access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::{collections::HashMap, sync::Arc};
use tracing::instrument;

use alloy::{
	core::dyn_abi::{DynSolType, DynSolValue},
	primitives::{hex, Address},
};

use crate::{
	models::{TransferEvent, TransferLog, TRANSFER_EVENT_SIGNATURE},
	services::blockchain::{error::BlockChainError, transports::HttpTransport},
	utils::parsing::parse_hex_u64,
};

/// Selector for the ERC-20 `name()` view function
const NAME_SELECTOR: &str = "0x06fdde03";

/// Defines the core interface to the ledger
#[async_trait]
pub trait LedgerClient: Send + Sync {
	/// Retrieves the latest block number from the ledger
	async fn latest_block_number(&self) -> Result<u64, BlockChainError>;

	/// Resolves a block number to its timestamp.
	///
	/// Fails with [`BlockChainError::BlockLookupError`] when the node cannot
	/// return the block (pruned history, transient RPC failure).
	async fn block_timestamp(&self, block_number: u64) -> Result<DateTime<Utc>, BlockChainError>;

	/// Reads a token contract's display name via its `name()` function
	async fn token_name(&self, contract: Address) -> Result<String, BlockChainError>;

	/// Retrieves decoded Transfer events for a contract over a block range (inclusive)
	async fn transfer_logs(
		&self,
		contract: Address,
		from_block: u64,
		to_block: u64,
	) -> Result<Vec<TransferEvent>, BlockChainError>;
}

/// Ledger client for EVM-compatible chains over JSON-RPC HTTP
#[derive(Clone, Debug)]
pub struct EvmLedgerClient {
	transport: Arc<HttpTransport>,
}

impl EvmLedgerClient {
	/// Creates a new EVM ledger client over an established transport
	pub fn new(transport: Arc<HttpTransport>) -> Self {
		Self { transport }
	}
}

#[async_trait]
impl LedgerClient for EvmLedgerClient {
	#[instrument(skip(self))]
	async fn latest_block_number(&self) -> Result<u64, BlockChainError> {
		let result = self
			.transport
			.send_raw_request("eth_blockNumber", None)
			.await
			.map_err(|e| {
				BlockChainError::request_error(
					"Failed to get latest block number",
					Some(Box::new(e)),
					None,
				)
			})?;

		let number = result.as_str().ok_or_else(|| {
			BlockChainError::request_error("eth_blockNumber result is not a string", None, None)
		})?;

		parse_hex_u64(number).map_err(|e| BlockChainError::request_error(e, None, None))
	}

	#[instrument(skip(self), fields(block_number))]
	async fn block_timestamp(&self, block_number: u64) -> Result<DateTime<Utc>, BlockChainError> {
		let metadata = HashMap::from([("block_number".to_string(), block_number.to_string())]);

		let result = self
			.transport
			.send_raw_request(
				"eth_getBlockByNumber",
				Some(json!([format!("0x{:x}", block_number), false])),
			)
			.await
			.map_err(|e| {
				BlockChainError::block_lookup_error(
					format!("Failed to fetch block {}", block_number),
					Some(Box::new(e)),
					Some(metadata.clone()),
				)
			})?;

		if result.is_null() {
			return Err(BlockChainError::block_lookup_error(
				format!("Block {} not found", block_number),
				None,
				Some(metadata),
			));
		}

		let timestamp_hex = result
			.get("timestamp")
			.and_then(|t| t.as_str())
			.ok_or_else(|| {
				BlockChainError::block_lookup_error(
					format!("Block {} has no timestamp field", block_number),
					None,
					Some(metadata.clone()),
				)
			})?;

		let seconds = parse_hex_u64(timestamp_hex)
			.map_err(|e| BlockChainError::block_lookup_error(e, None, Some(metadata.clone())))?;

		DateTime::<Utc>::from_timestamp(seconds as i64, 0).ok_or_else(|| {
			BlockChainError::block_lookup_error(
				format!("Block {} timestamp {} out of range", block_number, seconds),
				None,
				Some(metadata),
			)
		})
	}

	#[instrument(skip(self))]
	async fn token_name(&self, contract: Address) -> Result<String, BlockChainError> {
		let metadata = HashMap::from([("contract".to_string(), format!("{:#x}", contract))]);

		let result = self
			.transport
			.send_raw_request(
				"eth_call",
				Some(json!([
					{ "to": format!("{:#x}", contract), "data": NAME_SELECTOR },
					"latest"
				])),
			)
			.await
			.map_err(|e| {
				BlockChainError::request_error(
					"Failed to call name() on token contract",
					Some(Box::new(e)),
					Some(metadata.clone()),
				)
			})?;

		let return_data = result.as_str().ok_or_else(|| {
			BlockChainError::request_error(
				"eth_call result is not a string",
				None,
				Some(metadata.clone()),
			)
		})?;

		let bytes = hex::decode(return_data.trim_start_matches("0x")).map_err(|e| {
			BlockChainError::request_error(
				format!("Invalid hex in name() return data: {}", e),
				Some(Box::new(e)),
				Some(metadata.clone()),
			)
		})?;

		let decoded = DynSolType::Tuple(vec![DynSolType::String])
			.abi_decode_params(&bytes)
			.map_err(|e| {
				BlockChainError::request_error(
					format!("Failed to decode name() return data: {}", e),
					Some(Box::new(e)),
					Some(metadata.clone()),
				)
			})?;

		match decoded {
			DynSolValue::Tuple(values) => values
				.first()
				.and_then(|v| v.as_str())
				.map(|s| s.to_string())
				.ok_or_else(|| {
					BlockChainError::request_error(
						"name() returned no string value",
						None,
						Some(metadata),
					)
				}),
			_ => Err(BlockChainError::request_error(
				"Unexpected shape for name() return data",
				None,
				Some(metadata),
			)),
		}
	}

	#[instrument(skip(self), fields(from_block, to_block))]
	async fn transfer_logs(
		&self,
		contract: Address,
		from_block: u64,
		to_block: u64,
	) -> Result<Vec<TransferEvent>, BlockChainError> {
		let metadata = HashMap::from([
			("contract".to_string(), format!("{:#x}", contract)),
			("from_block".to_string(), from_block.to_string()),
			("to_block".to_string(), to_block.to_string()),
		]);

		let result = self
			.transport
			.send_raw_request(
				"eth_getLogs",
				Some(json!([{
					"fromBlock": format!("0x{:x}", from_block),
					"toBlock": format!("0x{:x}", to_block),
					"address": format!("{:#x}", contract),
					"topics": [format!("{:#x}", TRANSFER_EVENT_SIGNATURE)],
				}])),
			)
			.await
			.map_err(|e| {
				BlockChainError::request_error(
					"Failed to fetch transfer logs",
					Some(Box::new(e)),
					Some(metadata.clone()),
				)
			})?;

		let raw_logs: Vec<TransferLog> = serde_json::from_value(result).map_err(|e| {
			BlockChainError::request_error(
				format!("Failed to parse transfer logs: {}", e),
				Some(Box::new(e)),
				Some(metadata),
			)
		})?;

		let mut events = Vec::with_capacity(raw_logs.len());
		for log in raw_logs {
			match TransferEvent::try_from(log) {
				Ok(event) => events.push(event),
				Err(e) => {
					// A malformed log must not poison the whole batch
					tracing::warn!(error = %e, "Skipping undecodable transfer log");
				}
			}
		}

		Ok(events)
	}
}
