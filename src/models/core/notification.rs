//! Notification payload model.

use serde::Serialize;

/// Structured notification describing one matched transfer.
///
/// Built by the pipeline's enrichment step and consumed exactly once by the
/// notification sink, then discarded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NotificationPayload {
	/// Token display name
	pub token: String,
	/// The monitored address involved in the transfer (lowercase hex)
	pub address: String,
	/// "sent" or "received", from the monitored address's point of view
	pub action: String,
	/// Human-readable decimal amount
	pub amount: String,
	/// Hash of the transaction carrying the transfer (lowercase hex)
	pub transaction_hash: String,
	/// Block the transfer was included in
	pub block_number: u64,
	/// Block timestamp in ISO 8601 format
	pub timestamp: String,
}
