//! Storage operations
//!
//! Create, read, delete and list files directly under the base directory.
//! The filesystem is the only source of truth; nothing is cached between calls.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use log::{info, warn};

use crate::error::FileOpsError;
use crate::middleware::logging::log_operation;
use crate::storage::filesystem::{Filesystem, TokioFilesystem};
use crate::storage::results::{
    CreatedFile, DeletionResult, FileContent, ListedFile, meta_timestamps,
};
use crate::storage::validation::is_valid_filename;

/// File operations confined to a single base directory
pub struct FileOperations {
    base_dir: PathBuf,
    fs: Arc<dyn Filesystem>,
}

impl FileOperations {
    /// Builds the module without touching the disk. Call [`initialize`]
    /// before serving requests.
    ///
    /// [`initialize`]: FileOperations::initialize
    pub fn new(base_dir: impl Into<PathBuf>, fs: Arc<dyn Filesystem>) -> Self {
        let base_dir = base_dir.into();
        let base_dir = std::path::absolute(&base_dir).unwrap_or(base_dir);
        Self { base_dir, fs }
    }

    /// Builds the module on the real filesystem and ensures the base directory exists.
    pub async fn open(base_dir: impl Into<PathBuf>) -> Result<Self, FileOpsError> {
        let ops = Self::new(base_dir, Arc::new(TokioFilesystem));
        ops.initialize().await?;
        Ok(ops)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Ensures the base directory exists. Safe to call repeatedly.
    pub async fn initialize(&self) -> Result<(), FileOpsError> {
        self.fs
            .create_dir_all(&self.base_dir)
            .await
            .map_err(|source| FileOpsError::Initialization {
                path: self.base_dir.clone(),
                source,
            })?;

        info!("Base directory ready: {}", self.base_dir.display());
        Ok(())
    }

    /// Creates `filename` with `content`. Never overwrites.
    pub async fn create(&self, filename: &str, content: &str) -> Result<CreatedFile, FileOpsError> {
        let result = self.create_inner(filename, content).await;
        log_operation("create", filename, result.as_ref().map(|_| ()));
        result
    }

    async fn create_inner(&self, filename: &str, content: &str) -> Result<CreatedFile, FileOpsError> {
        let path = self.resolve(filename)?;

        // Exclusive create doubles as the existence probe
        self.fs
            .create_new(&path, content.as_bytes())
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => FileOpsError::AlreadyExists(filename.to_string()),
                _ => FileOpsError::storage("write", e),
            })?;

        Ok(CreatedFile {
            filename: filename.to_string(),
            path,
            size: content.len() as u64,
            created: Utc::now(),
        })
    }

    /// Reads `filename` together with its metadata.
    pub async fn read(&self, filename: &str) -> Result<FileContent, FileOpsError> {
        let result = self.read_inner(filename).await;
        log_operation("read", filename, result.as_ref().map(|_| ()));
        result
    }

    async fn read_inner(&self, filename: &str) -> Result<FileContent, FileOpsError> {
        let path = self.resolve(filename)?;
        let not_found_or = |operation: &'static str| {
            move |e: std::io::Error| match e.kind() {
                ErrorKind::NotFound => FileOpsError::NotFound(filename.to_string()),
                _ => FileOpsError::storage(operation, e),
            }
        };

        let content = self
            .fs
            .read_to_string(&path)
            .await
            .map_err(not_found_or("read"))?;

        // The file may vanish between the two calls; that is still a miss
        let meta = self.fs.metadata(&path).await.map_err(not_found_or("stat"))?;
        let (created, modified) = meta_timestamps(&meta);

        Ok(FileContent {
            filename: filename.to_string(),
            size: content.len() as u64,
            content,
            created,
            modified,
        })
    }

    /// Deletes `filename`. A missing file is `NotFound`, a failed removal
    /// after a successful probe is a storage failure.
    pub async fn delete(&self, filename: &str) -> Result<DeletionResult, FileOpsError> {
        let result = self.delete_inner(filename).await;
        log_operation("delete", filename, result.as_ref().map(|_| ()));
        result
    }

    async fn delete_inner(&self, filename: &str) -> Result<DeletionResult, FileOpsError> {
        let path = self.resolve(filename)?;

        let exists = self
            .fs
            .exists(&path)
            .await
            .map_err(|e| FileOpsError::storage("probe", e))?;
        if !exists {
            return Err(FileOpsError::NotFound(filename.to_string()));
        }

        self.fs
            .remove_file(&path)
            .await
            .map_err(|e| FileOpsError::storage("remove", e))?;

        Ok(DeletionResult {
            filename: filename.to_string(),
            deleted: true,
            timestamp: Utc::now(),
        })
    }

    /// Lists regular files in the base directory, sorted by name.
    ///
    /// Metadata is fetched concurrently and the first failure fails the
    /// whole listing.
    pub async fn list(&self) -> Result<Vec<ListedFile>, FileOpsError> {
        let result = self.list_inner().await;
        match &result {
            Ok(files) => info!("op=list outcome=ok count={}", files.len()),
            Err(e) => log_operation("list", "*", Err(e)),
        }
        result
    }

    async fn list_inner(&self) -> Result<Vec<ListedFile>, FileOpsError> {
        let names = self
            .fs
            .read_dir(&self.base_dir)
            .await
            .map_err(|e| FileOpsError::storage("readdir", e))?;

        // Names that are not UTF-8 cannot be addressed through the API
        let names = names.into_iter().filter_map(|name| match name.into_string() {
            Ok(name) => Some(name),
            Err(raw) => {
                warn!("Skipping non UTF-8 entry {:?} in listing", raw);
                None
            }
        });

        let fs = &self.fs;
        let base_dir = &self.base_dir;
        let lookups = names.map(|name| async move {
            let meta = fs
                .metadata(&base_dir.join(&name))
                .await
                .map_err(|e| FileOpsError::storage("stat", e))?;
            Ok::<_, FileOpsError>((name, meta))
        });

        let mut files: Vec<ListedFile> = try_join_all(lookups)
            .await?
            .into_iter()
            .filter(|(_, meta)| meta.is_file)
            .map(|(filename, meta)| {
                let (created, modified) = meta_timestamps(&meta);
                ListedFile {
                    filename,
                    size: meta.len,
                    created,
                    modified,
                }
            })
            .collect();

        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }

    /// Validates `filename` and joins it onto the base directory.
    fn resolve(&self, filename: &str) -> Result<PathBuf, FileOpsError> {
        if !is_valid_filename(filename) {
            return Err(FileOpsError::InvalidName(filename.to_string()));
        }
        Ok(self.base_dir.join(filename))
    }
}
