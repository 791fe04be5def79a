//! HTTP transport implementation for ledger interactions.
//!
//! Provides a JSON-RPC client over HTTP with:
//! - Connection health check at construction time
//! - Configurable retry policy for transient failures
//! - Unique request IDs per call

use anyhow::Context;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{json, Value};
use std::{
	collections::HashMap,
	sync::atomic::{AtomicU64, Ordering},
	time::Duration,
};
use url::Url;

use crate::{
	services::blockchain::transports::TransportError,
	utils::http::{create_retryable_http_client, RetryConfig},
};

/// JSON-RPC transport over a single HTTP endpoint.
///
/// The client is thread-safe and can be shared across tasks; request IDs are
/// drawn from an atomic counter so concurrent calls stay distinguishable in
/// node-side logs.
#[derive(Debug)]
pub struct HttpTransport {
	/// Retryable HTTP client for making requests
	client: ClientWithMiddleware,
	/// The RPC endpoint URL
	url: Url,
	/// Monotonic request ID counter
	request_id: AtomicU64,
}

impl HttpTransport {
	/// Creates a new HTTP transport and verifies the endpoint is reachable.
	///
	/// The connectivity probe is a `net_version` request; an endpoint that
	/// cannot answer it will not be able to serve the monitor either.
	///
	/// # Arguments
	/// * `rpc_url` - The JSON-RPC endpoint URL
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - New transport or connection error
	pub async fn new(rpc_url: &str) -> Result<Self, anyhow::Error> {
		let url = Url::parse(rpc_url).with_context(|| format!("Invalid RPC URL: {}", rpc_url))?;

		let base_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.context("Failed to create base HTTP client")?;

		let client = create_retryable_http_client(&RetryConfig::default(), base_client);

		let test_request = json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "net_version",
			"params": []
		});

		let response = client
			.post(url.clone())
			.json(&test_request)
			.send()
			.await
			.with_context(|| format!("Failed to connect to {}", url))?;

		if !response.status().is_success() {
			return Err(anyhow::anyhow!(
				"Failed to connect to {}: status {}",
				url,
				response.status().as_u16()
			));
		}

		Ok(Self {
			client,
			url,
			request_id: AtomicU64::new(1),
		})
	}

	/// Sends a JSON-RPC request and returns the `result` field.
	///
	/// # Arguments
	/// * `method` - The JSON-RPC method name to call
	/// * `params` - Optional parameters for the method call
	///
	/// # Returns
	/// * `Result<Value, TransportError>` - The `result` value or error with context
	pub async fn send_raw_request(
		&self,
		method: &str,
		params: Option<Value>,
	) -> Result<Value, TransportError> {
		let request = json!({
			"jsonrpc": "2.0",
			"id": self.request_id.fetch_add(1, Ordering::Relaxed),
			"method": method,
			"params": params.unwrap_or_else(|| json!([])),
		});

		let metadata = HashMap::from([
			("method".to_string(), method.to_string()),
			("url".to_string(), self.url.to_string()),
		]);

		let response = self
			.client
			.post(self.url.clone())
			.json(&request)
			.send()
			.await
			.map_err(|e| {
				TransportError::network(
					format!("Failed to send request: {}", e),
					Some(Box::new(e)),
					Some(metadata.clone()),
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(TransportError::http(
				status,
				self.url.to_string(),
				body,
				None,
				Some(metadata),
			));
		}

		let body: Value = response.json().await.map_err(|e| {
			TransportError::response_parse(
				format!("Failed to parse response body: {}", e),
				Some(Box::new(e)),
				Some(metadata.clone()),
			)
		})?;

		if let Some(error) = body.get("error") {
			return Err(TransportError::rpc(
				format!("RPC request failed: {}", error),
				None,
				Some(metadata),
			));
		}

		body.get("result").cloned().ok_or_else(|| {
			TransportError::response_parse(
				"RPC response missing result field",
				None,
				Some(metadata),
			)
		})
	}
}
