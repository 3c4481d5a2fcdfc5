//! Filesystem abstraction
//!
//! The storage operations only reach the disk through [`Filesystem`], so the
//! production backend can be swapped for a fault-injecting one in tests.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use async_trait::async_trait;
use log::warn;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Subset of file metadata the storage layer needs
#[derive(Debug, Clone)]
pub struct FileMeta {
    pub len: u64,
    pub is_file: bool,
    /// Birth time, when the platform reports one
    pub created: Option<SystemTime>,
    pub modified: SystemTime,
}

impl From<std::fs::Metadata> for FileMeta {
    fn from(metadata: std::fs::Metadata) -> Self {
        Self {
            len: metadata.len(),
            is_file: metadata.is_file(),
            created: metadata.created().ok(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        }
    }
}

/// Asynchronous filesystem primitives used by the storage operations
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all missing parents
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Existence probe
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Create `path` exclusively and write `contents` to it.
    ///
    /// Fails with `ErrorKind::AlreadyExists` if anything is already there.
    async fn create_new(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    async fn metadata(&self, path: &Path) -> io::Result<FileMeta>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Names of the direct entries of a directory, exactly as stored on disk
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;
}

/// Filesystem backed by `tokio::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFilesystem;

#[async_trait]
impl Filesystem for TokioFilesystem {
    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path).await
    }

    async fn exists(&self, path: &Path) -> io::Result<bool> {
        fs::try_exists(path).await
    }

    async fn create_new(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;

        let written = async {
            file.write_all(contents).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            // Do not leave a truncated file behind
            drop(file);
            if let Err(cleanup) = fs::remove_file(path).await {
                warn!(
                    "Failed to remove partial file {}: {}",
                    path.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        Ok(())
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path).await
    }

    async fn metadata(&self, path: &Path) -> io::Result<FileMeta> {
        fs::metadata(path).await.map(FileMeta::from)
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut entries = fs::read_dir(path).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name());
        }

        Ok(names)
    }
}
