//! Logging middleware
//!
//! Logger setup plus the structured events emitted for connections,
//! requests and file operations. Only the `log` facade is used outside
//! of [`setup_logging`].

use log::{error, info, warn};
use std::net::SocketAddr;

use crate::error::FileOpsError;

/// Setup logging for the server.
///
/// `RUST_LOG` wins over `default_level` when set.
pub fn setup_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

/// Log a client connection
pub fn log_connection(client_addr: &SocketAddr) {
    info!("Client connected: {}", client_addr);
}

/// Log a handled request with its response status
pub fn log_request(client_addr: &SocketAddr, method: &str, path: &str, status: u16) {
    info!("{} {} {} -> {}", client_addr, method, path, status);
}

/// Log the outcome of a file operation as `op=.. filename=.. outcome=..`.
pub fn log_operation(operation: &str, filename: &str, outcome: Result<(), &FileOpsError>) {
    match outcome {
        Ok(_) => info!("op={} filename={} outcome=ok", operation, filename),
        Err(e @ (FileOpsError::Storage { .. } | FileOpsError::Initialization { .. })) => error!(
            "op={} filename={} outcome={} error=\"{}\"",
            operation,
            filename,
            e.kind(),
            e
        ),
        Err(e) => warn!("op={} filename={} outcome={}", operation, filename, e.kind()),
    }
}
