//! Core domain models.

mod decision;
mod event;
mod notification;

pub use decision::{Decision, TransferDirection};
pub use event::{LogDecodeError, TransferEvent, TransferLog, TRANSFER_EVENT_SIGNATURE};
pub use notification::NotificationPayload;
