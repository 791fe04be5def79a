//! Notification delivery functionality.
//!
//! Implements the outbound side of the monitor: formatting matched transfers
//! into messages and delivering them over SMTP.

mod email;
mod error;

pub use email::{EmailNotifier, SmtpConfig};
pub use error::NotificationError;
