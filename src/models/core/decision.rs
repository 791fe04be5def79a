//! Filter decision model.

use alloy::primitives::Address;

/// Which side of a transfer the monitored party took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
	/// The monitored address is the sender
	Sent,
	/// The monitored address is the receiver
	Received,
}

impl TransferDirection {
	/// Human-readable action label used in notifications
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Sent => "sent",
			Self::Received => "received",
		}
	}
}

/// Outcome of evaluating a transfer against the monitored address set.
///
/// Computed once per event and never stored. When both sides of a transfer
/// are monitored, the `from` side wins: the decision reports `Sent` with the
/// sender as the watched address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
	/// Neither address of the transfer is monitored
	NotRelevant,
	/// At least one address is monitored
	Relevant {
		/// The monitored address involved in the transfer
		watched_address: Address,
		/// The role the monitored address played
		direction: TransferDirection,
	},
}

impl Decision {
	pub fn is_relevant(&self) -> bool {
		matches!(self, Self::Relevant { .. })
	}
}
