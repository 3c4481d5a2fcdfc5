//! RAX File API - Entry Point
//!
//! A small REST server that creates, reads, lists and deletes files in a
//! single managed directory.

use log::{error, info};
use std::process::ExitCode;

use rax_file_api::config::{DEFAULT_CONFIG_PATH, ServerConfig};
use rax_file_api::middleware::logging::setup_logging;
use rax_file_api::Server;

#[tokio::main]
async fn main() -> ExitCode {
    // Optional first argument: path to the config file
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = match ServerConfig::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration from {config_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    setup_logging(&config.log_level);

    info!("Launching file API server...");

    let server = match Server::from_config(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    server.run().await;
    info!("Server stopped");
    ExitCode::SUCCESS
}
