//! Domain models and data structures for transfer monitoring.
//!
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (events, decisions, notification payloads)
//! - `security`: Security models (secrets)

mod config;
mod core;
mod security;

pub use config::{AppConfig, ConfigError, NotificationSettings};
pub use core::{
	Decision, LogDecodeError, NotificationPayload, TransferDirection, TransferEvent, TransferLog,
	TRANSFER_EVENT_SIGNATURE,
};
pub use security::SecretString;
