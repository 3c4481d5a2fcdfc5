//! File system storage management
//!
//! Handles filename validation, the filesystem abstraction and file operations.

pub mod filesystem;
pub mod operations;
pub mod results;
pub mod validation;

pub use filesystem::{FileMeta, Filesystem, TokioFilesystem};
pub use operations::FileOperations;
pub use results::{CreatedFile, DeletionResult, FileContent, ListedFile};
pub use validation::{MAX_FILENAME_LENGTH, is_valid_filename};
