//! Address filtering for transfer events.
//!
//! The filter is a pure predicate over the configured address set: no I/O, no
//! shared mutable state, identical inputs always give identical decisions.

use alloy::primitives::Address;
use std::collections::HashSet;

use crate::models::{Decision, TransferDirection};

/// Decides whether a transfer involves a monitored address and which side
/// the monitored party took.
///
/// Addresses are held as 20-byte values, so membership is byte-level and the
/// casing of the textual form an address arrived in cannot affect the result.
/// The set is immutable after construction and lives for the process lifetime.
#[derive(Debug, Clone)]
pub struct AddressFilter {
	monitored: HashSet<Address>,
}

impl AddressFilter {
	/// Creates a filter over the given monitored addresses
	pub fn new(addresses: impl IntoIterator<Item = Address>) -> Self {
		Self {
			monitored: addresses.into_iter().collect(),
		}
	}

	/// Number of monitored addresses
	pub fn len(&self) -> usize {
		self.monitored.len()
	}

	pub fn is_empty(&self) -> bool {
		self.monitored.is_empty()
	}

	/// Evaluates a transfer's sender and receiver against the monitored set.
	///
	/// When the `from` side is monitored the decision is `Sent` reporting
	/// `from`, regardless of whether `to` is also monitored; only a transfer
	/// whose sender is not monitored can resolve to `Received`.
	pub fn evaluate(&self, from: Address, to: Address) -> Decision {
		if self.monitored.contains(&from) {
			Decision::Relevant {
				watched_address: from,
				direction: TransferDirection::Sent,
			}
		} else if self.monitored.contains(&to) {
			Decision::Relevant {
				watched_address: to,
				direction: TransferDirection::Received,
			}
		} else {
			Decision::NotRelevant
		}
	}
}
