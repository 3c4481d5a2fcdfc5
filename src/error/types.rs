//! Error types
//!
//! Defines the error taxonomy of the file operations module and the HTTP layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// File operations module errors
#[derive(Debug, Error)]
pub enum FileOpsError {
    #[error("Invalid filename: {0}")]
    InvalidName(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to initialize base directory {}: {source}", .path.display())]
    Initialization {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Storage failure during {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: io::Error,
    },
}

impl FileOpsError {
    pub(crate) fn storage(operation: &'static str, source: io::Error) -> Self {
        FileOpsError::Storage { operation, source }
    }

    /// Short machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            FileOpsError::InvalidName(_) => "invalid_name",
            FileOpsError::AlreadyExists(_) => "already_exists",
            FileOpsError::NotFound(_) => "not_found",
            FileOpsError::Initialization { .. } => "initialization_failure",
            FileOpsError::Storage { .. } => "storage_failure",
        }
    }

    /// Message safe to show to an HTTP client.
    ///
    /// Never includes the underlying I/O error.
    pub fn public_message(&self) -> &'static str {
        match self {
            FileOpsError::InvalidName(_) => "Invalid filename",
            FileOpsError::AlreadyExists(_) => "File already exists",
            FileOpsError::NotFound(_) => "File not found",
            FileOpsError::Initialization { .. } => "Storage unavailable",
            FileOpsError::Storage { .. } => "Internal storage error",
        }
    }
}

/// HTTP layer errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    RouteNotFound,

    /// Body longer than the configured limit, in bytes
    #[error("Payload too large: limit is {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Request body not received in time")]
    RequestTimeout,

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error(transparent)]
    FileOps(#[from] FileOpsError),
}

impl ApiError {
    /// Message placed in the JSON error body.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::MalformedRequest(msg) => msg.clone(),
            ApiError::MethodNotAllowed => "Method not allowed".into(),
            ApiError::RouteNotFound => "Not found".into(),
            ApiError::PayloadTooLarge(_) => "Payload too large".into(),
            ApiError::RequestTimeout => "Request timeout".into(),
            ApiError::ServiceUnavailable => "Too many connections".into(),
            ApiError::FileOps(e) => e.public_message().into(),
        }
    }
}

/// Startup errors that terminate the process
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    FileOps(#[from] FileOpsError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}
