//! Storage result types
//!
//! Defines result structures returned by storage operations. They serialize
//! directly into the JSON response bodies.

use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::storage::filesystem::FileMeta;

/// Result of a file creation
#[derive(Debug, Clone, Serialize)]
pub struct CreatedFile {
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
    pub created: DateTime<Utc>,
}

/// Result of a file read
#[derive(Debug, Clone, Serialize)]
pub struct FileContent {
    pub filename: String,
    pub content: String,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedFile {
    pub filename: String,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Result of a file deletion
#[derive(Debug, Clone, Serialize)]
pub struct DeletionResult {
    pub filename: String,
    pub deleted: bool,
    pub timestamp: DateTime<Utc>,
}

/// Timestamps taken from metadata; birth time falls back to mtime.
pub(crate) fn meta_timestamps(meta: &FileMeta) -> (DateTime<Utc>, DateTime<Utc>) {
    let modified = to_utc(meta.modified);
    let created = meta.created.map(to_utc).unwrap_or(modified);
    (created, modified)
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}
