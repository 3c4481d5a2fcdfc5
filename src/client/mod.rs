//! Client connection handling
//!
//! Serves the HTTP session of each accepted connection.

pub mod handler;

pub use handler::{handle_client, reject_client};
