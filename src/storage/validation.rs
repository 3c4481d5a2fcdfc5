//! Filename validation
//!
//! The single gate against path traversal and hidden files. Every storage
//! operation calls it before touching the filesystem.

/// Maximum accepted filename length in bytes
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Returns true if `filename` may be used as a file in the base directory.
///
/// Accepts `[A-Za-z0-9-_.]{1,255}` names that neither start with `.` nor
/// contain `..`. Separators are outside the accepted character class.
pub fn is_valid_filename(filename: &str) -> bool {
    if filename.is_empty() || filename.len() > MAX_FILENAME_LENGTH {
        return false;
    }

    if filename.starts_with('.') || filename.contains("..") {
        return false;
    }

    filename
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}
