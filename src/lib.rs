//! Token transfer monitoring and notification service.
//!
//! This library watches a single ERC-20 token contract for `Transfer`
//! events, filters them against a configured set of monitored addresses,
//! and delivers an email notification for every relevant transfer. It
//! includes:
//!
//! - Configuration management through a JSON file
//! - JSON-RPC access to an EVM node for logs, blocks and contract calls
//! - Address filtering with sender-side precedence
//! - Enrichment with block timestamps and token metadata
//! - Email notification delivery over SMTP
//!
//! # Module Structure
//!
//! - `bootstrap`: Bootstraps the application
//! - `models`: Data structures for configuration and ledger data
//! - `services`: Core business logic and ledger interaction
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
