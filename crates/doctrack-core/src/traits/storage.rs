//! Storage provider trait for the document filesystem.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Metadata about one directory entry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageEntry {
    /// Entry name (last path component).
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Whether this is a directory.
    pub is_directory: bool,
}

/// Trait for the filesystem holding documents and their histories.
///
/// The [`StorageProvider`] trait is defined here in `doctrack-core` and
/// implemented in `doctrack-storage`. Paths are absolute, already resolved
/// by the storage layout.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Read a file into memory.
    async fn read_bytes(&self, path: &Path) -> AppResult<Bytes>;

    /// Replace the file at `path` with `data`, creating parents as needed.
    async fn write(&self, path: &Path, data: Bytes) -> AppResult<()>;

    /// Create exactly one directory. Fails with a conflict if it exists.
    async fn create_dir(&self, path: &Path) -> AppResult<()>;

    /// Create a directory and any missing parents.
    async fn create_dir_all(&self, path: &Path) -> AppResult<()>;

    /// Move a file; the destination's parent must exist.
    async fn rename(&self, from: &Path, to: &Path) -> AppResult<()>;

    /// Delete a file. Returns whether something was deleted.
    async fn delete(&self, path: &Path) -> AppResult<bool>;

    /// Delete a directory and all its contents.
    async fn delete_dir(&self, path: &Path) -> AppResult<()>;

    /// Check whether a file or directory exists.
    async fn exists(&self, path: &Path) -> AppResult<bool>;

    /// Get metadata about a file or directory.
    async fn metadata(&self, path: &Path) -> AppResult<StorageEntry>;

    /// List a directory. A missing directory lists as empty.
    async fn list(&self, path: &Path) -> AppResult<Vec<StorageEntry>>;
}
