//! Email notification implementation.
//!
//! Delivers transfer notifications over SMTP. A delivery either succeeds or
//! returns a [`NotificationError`]; the notifier never retries internally.
//! The pipeline logs the failure and moves on to the next event.

use email_address::EmailAddress;
use lettre::{
	message::{
		header::{self, ContentType},
		Mailbox, Mailboxes,
	},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::{error::Error as StdError, sync::Arc};

use crate::{
	models::{NotificationPayload, NotificationSettings},
	services::notification::NotificationError,
};

/// Configuration for the SMTP connection
#[derive(Clone, Debug)]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: String,
	pub password: String,
}

/// Delivers transfer notifications via SMTP
#[derive(Debug)]
pub struct EmailNotifier<T: AsyncTransport + Send + Sync> {
	/// SMTP client for email delivery
	client: Arc<T>,
	/// Email sender
	sender: EmailAddress,
	/// Email recipients
	recipients: Vec<EmailAddress>,
}

impl<T: AsyncTransport + Send + Sync> EmailNotifier<T>
where
	T::Ok: Send + Sync,
	T::Error: StdError + Send + Sync + 'static,
{
	/// Creates a new email notifier instance with a custom transport.
	///
	/// Primarily used in tests with lettre's stub transport.
	pub fn with_transport(
		transport: T,
		sender: EmailAddress,
		recipients: Vec<EmailAddress>,
	) -> Self {
		Self {
			client: Arc::new(transport),
			sender,
			recipients,
		}
	}

	/// Formats a notification payload as the plain-text email body
	pub fn format_body(payload: &NotificationPayload) -> String {
		format!(
			"Transfer Details:\n\
			 Token: {}\n\
			 Address: {}\n\
			 Action: {}\n\
			 Amount: {}\n\
			 Transaction Hash: {}\n\
			 Block Number: {}\n\
			 Timestamp: {}\n",
			payload.token,
			payload.address,
			payload.action,
			payload.amount,
			payload.transaction_hash,
			payload.block_number,
			payload.timestamp,
		)
	}

	/// Sends one notification for a matched transfer.
	///
	/// # Arguments
	/// * `payload` - The structured notification to deliver
	///
	/// # Returns
	/// * `Result<(), NotificationError>` - Success or error with the underlying cause
	pub async fn notify(&self, payload: &NotificationPayload) -> Result<(), NotificationError> {
		let recipients_str = self
			.recipients
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join(", ");

		let mailboxes: Mailboxes = recipients_str.parse::<Mailboxes>().map_err(|e| {
			NotificationError::notify_failed(
				format!("Failed to parse recipients: {}", e),
				Some(e.into()),
				None,
			)
		})?;
		let recipients_header: header::To = mailboxes.into();

		let email = Message::builder()
			.mailbox(recipients_header)
			.from(self.sender.to_string().parse::<Mailbox>().map_err(|e| {
				NotificationError::notify_failed(
					format!("Failed to parse sender: {}", e),
					Some(e.into()),
					None,
				)
			})?)
			.subject(format!("Transfer Notification: {}", payload.token))
			.header(ContentType::TEXT_PLAIN)
			.body(Self::format_body(payload))
			.map_err(|e| {
				NotificationError::notify_failed(
					format!("Failed to build email message: {}", e),
					Some(e.into()),
					None,
				)
			})?;

		self.client.send(email).await.map_err(|e| {
			NotificationError::notify_failed(
				format!("Failed to send email: {}", e),
				Some(Box::new(e)),
				None,
			)
		})?;

		Ok(())
	}
}

impl EmailNotifier<AsyncSmtpTransport<Tokio1Executor>> {
	/// Creates a new email notifier over an SMTP relay
	pub fn new(
		smtp_config: SmtpConfig,
		sender: EmailAddress,
		recipients: Vec<EmailAddress>,
	) -> Result<Self, NotificationError> {
		let client = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp_config.host)
			.map_err(|e| {
				NotificationError::config_error(
					format!("Failed to create SMTP transport: {}", e),
					Some(Box::new(e)),
					None,
				)
			})?
			.port(smtp_config.port)
			.credentials(Credentials::new(smtp_config.username, smtp_config.password))
			.build();

		Ok(Self {
			client: Arc::new(client),
			sender,
			recipients,
		})
	}

	/// Creates an email notifier from the application's notification settings
	pub fn from_settings(settings: &NotificationSettings) -> Result<Self, NotificationError> {
		let smtp_config = SmtpConfig {
			host: settings.smtp_host.clone(),
			port: settings.smtp_port,
			username: settings.username.clone(),
			password: settings.password.as_str().to_string(),
		};

		Self::new(
			smtp_config,
			settings.sender.clone(),
			settings.recipients.clone(),
		)
	}
}
