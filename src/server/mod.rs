//! Server core functionality
//!
//! Owns the listener and the file operations, and spawns one task per
//! connection.

pub mod core;

pub use self::core::Server;
