//! Network transport for the ledger client.
//!
//! Provides a JSON-RPC HTTP transport with retry middleware for transient
//! failures.

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransport;
