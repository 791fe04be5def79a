//! Ledger access layer.
//!
//! - Generic [`LedgerClient`] trait the rest of the system depends on
//! - EVM implementation over a JSON-RPC HTTP transport

mod client;
mod error;
mod transports;

pub use client::{EvmLedgerClient, LedgerClient};
pub use error::BlockChainError;
pub use transports::{HttpTransport, TransportError};
