//! Service implementations for the transfer monitor.
//!
//! - `blockchain`: JSON-RPC access to the EVM ledger
//! - `filter`: monitored address matching for decoded transfers
//! - `notification`: email delivery of transfer notifications
//! - `pipeline`: per-event enrichment and delivery
//! - `subscription`: event subscription lifecycle and dispatch

pub mod blockchain;
pub mod filter;
pub mod notification;
pub mod pipeline;
pub mod subscription;
