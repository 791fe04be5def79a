//! Event subscription lifecycle and dispatch.

mod error;
mod manager;
mod source;

pub use error::SubscriptionError;
pub use manager::{
	dispatch_events, SubscriptionManager, SubscriptionState, MAX_SETUP_ATTEMPTS,
	SETUP_RETRY_INTERVAL,
};
pub use source::{LedgerEventSource, TransferEventSource};
