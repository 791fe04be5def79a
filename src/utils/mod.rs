//! Utility modules for common functionality.
//!
//! - http: retryable HTTP client construction for the RPC transport
//! - logging: logging setup and error context utilities
//! - parsing: hex-quantity and token-amount conversions

pub mod http;
pub mod logging;
pub mod parsing;

pub use http::*;
pub use parsing::*;
