//! Token transfer monitor entry point.
//!
//! This binary loads the application configuration, initializes all
//! services, establishes the transfer event subscription and dispatches
//! incoming events until a shutdown signal arrives.
//!
//! # Flow
//! 1. Parse CLI options and apply them to the environment
//! 2. Initialize logging
//! 3. Load and validate the configuration file
//! 4. Initialize services and resolve token metadata
//! 5. Establish the subscription (with bounded setup retries)
//! 6. Dispatch events until Ctrl+C, then drain in-flight handlers

use transfer_monitor::{
	bootstrap::initialize_services,
	models::AppConfig,
	utils::logging::setup_logging,
};

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv_override;
use std::{env::set_var, path::PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(
	name = "transfer-monitor",
	about = "Watches an ERC-20 token contract for transfers involving monitored addresses and sends email notifications.",
	version
)]
struct Cli {
	/// Path to the configuration file
	#[arg(long, value_name = "PATH", default_value = "config/monitor.json")]
	config: PathBuf,

	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Validate the configuration file without starting the service
	#[arg(long)]
	check: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Reload environment variables from .env file
		// Override any existing environment variables
		dotenv_override().ok();

		// Log file mode - override if CLI flag is set
		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		// Log level - override if CLI flag is set
		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		// Log path - override if CLI flag is set
		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}
	}
}

/// Main entry point for the transfer monitoring service.
///
/// # Errors
/// Returns an error if configuration loading, service initialization or
/// subscription setup fails.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	// Apply CLI options to environment
	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	let config = AppConfig::load(&cli.config)
		.map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

	// If --check flag is provided, only validate configuration and exit
	if cli.check {
		info!("Configuration is valid");
		return Ok(());
	}

	let services = initialize_services(&config)
		.await
		.map_err(|e| anyhow::anyhow!("Failed to initialize services: {}", e))?;

	let mut manager = services.manager;
	let receiver = manager
		.start(config.token_address)
		.await
		.map_err(|e| anyhow::anyhow!("Failed to establish subscription: {}", e))?;

	let dispatch = tokio::spawn(transfer_monitor::services::subscription::dispatch_events(
		receiver,
		services.pipeline,
	));

	info!("Service started. Press Ctrl+C to shutdown");

	let _ = tokio::signal::ctrl_c().await;
	info!("Shutdown signal received, stopping services...");

	// Stopping the poll loop closes the event channel, which lets the
	// dispatcher drain in-flight handlers before returning.
	let _ = services.shutdown_tx.send(true);
	if let Err(e) = dispatch.await {
		error!("Error during shutdown: {}", e);
	}

	info!("Shutdown complete");
	Ok(())
}
