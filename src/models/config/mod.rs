//! Application configuration loading and validation.
//!
//! The monitor is configured from a single JSON file. Addresses are parsed
//! into typed `Address` values at load time, so any case variant of the same
//! address ends up as the same 20-byte value and later membership checks
//! cannot be defeated by casing.

pub mod error;

use alloy::primitives::Address;
use email_address::EmailAddress;
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};
use url::Url;

use crate::models::security::SecretString;

pub use error::ConfigError;

fn default_poll_interval_secs() -> u64 {
	12
}

fn default_smtp_port() -> u16 {
	465
}

/// SMTP and addressing settings for outbound notifications
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationSettings {
	/// SMTP relay hostname
	pub smtp_host: String,

	/// SMTP relay port
	#[serde(default = "default_smtp_port")]
	pub smtp_port: u16,

	/// SMTP username
	pub username: String,

	/// SMTP password
	pub password: SecretString,

	/// Sender mailbox
	pub sender: EmailAddress,

	/// Recipient mailboxes
	pub recipients: Vec<EmailAddress>,
}

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
	/// JSON-RPC endpoint of the ledger node
	pub rpc_url: String,

	/// Addresses whose transfers trigger notifications
	pub monitored_addresses: Vec<Address>,

	/// The token contract to monitor
	pub token_address: Address,

	/// Interval between log polls, in seconds
	#[serde(default = "default_poll_interval_secs")]
	pub poll_interval_secs: u64,

	/// Outbound notification settings
	pub notifications: NotificationSettings,
}

impl AppConfig {
	/// Loads and validates the configuration from a JSON file.
	///
	/// # Arguments
	/// * `path` - Path to the configuration file
	///
	/// # Returns
	/// * `Result<Self, ConfigError>` - Validated configuration or error
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let contents = fs::read_to_string(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read config file: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;

		let config: AppConfig = serde_json::from_str(&contents).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse config file: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;

		config.validate()?;
		Ok(config)
	}

	/// Validates configuration invariants that the type system cannot express.
	pub fn validate(&self) -> Result<(), ConfigError> {
		Url::parse(&self.rpc_url).map_err(|e| {
			ConfigError::validation_error(
				format!("rpc_url is not a valid URL: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"rpc_url".to_string(),
					self.rpc_url.clone(),
				)])),
			)
		})?;

		if self.monitored_addresses.is_empty() {
			return Err(ConfigError::validation_error(
				"monitored_addresses must not be empty",
				None,
				None,
			));
		}

		if self.poll_interval_secs == 0 {
			return Err(ConfigError::validation_error(
				"poll_interval_secs must be greater than zero",
				None,
				None,
			));
		}

		if self.notifications.smtp_host.is_empty() {
			return Err(ConfigError::validation_error(
				"notifications.smtp_host must not be empty",
				None,
				None,
			));
		}

		if self.notifications.recipients.is_empty() {
			return Err(ConfigError::validation_error(
				"notifications.recipients must not be empty",
				None,
				None,
			));
		}

		Ok(())
	}
}
