//! Integration tests for email notification delivery.

use email_address::EmailAddress;
use lettre::transport::stub::AsyncStubTransport;
use std::str::FromStr;

use transfer_monitor::{
	models::{NotificationPayload, NotificationSettings, SecretString},
	services::notification::{EmailNotifier, NotificationError},
};

fn settings() -> NotificationSettings {
	NotificationSettings {
		smtp_host: "smtp.example.com".to_string(),
		smtp_port: 465,
		username: "monitor".to_string(),
		password: SecretString::new("hunter2".to_string()),
		sender: EmailAddress::from_str("monitor@example.com").unwrap(),
		recipients: vec![
			EmailAddress::from_str("ops@example.com").unwrap(),
			EmailAddress::from_str("oncall@example.com").unwrap(),
		],
	}
}

fn payload() -> NotificationPayload {
	NotificationPayload {
		token: "Dai Stablecoin".to_string(),
		address: "0x1111111111111111111111111111111111111111".to_string(),
		action: "received".to_string(),
		amount: "0.000021".to_string(),
		transaction_hash: format!("0x{}", "cd".repeat(32)),
		block_number: 19_000_123,
		timestamp: "2024-03-01T12:00:00.000Z".to_string(),
	}
}

#[test]
fn test_notifier_builds_from_settings() {
	assert!(EmailNotifier::from_settings(&settings()).is_ok());
}

#[tokio::test]
async fn test_notify_addresses_all_recipients() {
	let transport = AsyncStubTransport::new_ok();
	let notifier = EmailNotifier::with_transport(
		transport.clone(),
		EmailAddress::from_str("monitor@example.com").unwrap(),
		vec![
			EmailAddress::from_str("ops@example.com").unwrap(),
			EmailAddress::from_str("oncall@example.com").unwrap(),
		],
	);

	notifier.notify(&payload()).await.unwrap();

	let messages = transport.messages().await;
	assert_eq!(messages.len(), 1);
	let (envelope, content) = &messages[0];
	assert_eq!(envelope.to().len(), 2);
	assert!(content.contains("Transfer Notification: Dai Stablecoin"));
	assert!(content.contains("Amount: 0.000021"));
}

#[tokio::test]
async fn test_notify_makes_exactly_one_attempt_on_failure() {
	let transport = AsyncStubTransport::new_error();
	let notifier = EmailNotifier::with_transport(
		transport.clone(),
		EmailAddress::from_str("monitor@example.com").unwrap(),
		vec![EmailAddress::from_str("ops@example.com").unwrap()],
	);

	let result = notifier.notify(&payload()).await;
	assert!(matches!(result, Err(NotificationError::NotifyFailed(_))));
	// Delivery is single-shot, retrying is left to upstream operators.
	assert_eq!(transport.messages().await.len(), 1);
}
