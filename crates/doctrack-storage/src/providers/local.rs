//! Local filesystem storage provider.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use doctrack_core::error::{AppError, ErrorKind};
use doctrack_core::result::AppResult;
use doctrack_core::traits::storage::{StorageEntry, StorageProvider};

/// Local filesystem storage provider.
#[derive(Debug, Clone, Default)]
pub struct LocalStorageProvider;

impl LocalStorageProvider {
    /// Create a new local storage provider.
    pub fn new() -> Self {
        Self
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn read_bytes(&self, path: &Path) -> AppResult<Bytes> {
        let data = fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {}", path.display()))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read file: {}", path.display()),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, path: &Path, data: Bytes) -> AppResult<()> {
        self.ensure_parent(path).await?;

        // Write next to the target and swap it in, so readers never see a
        // half-written document.
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let partial = path.with_file_name(format!(".{file_name}.part"));

        fs::write(&partial, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {}", path.display()),
                e,
            )
        })?;
        if let Err(e) = fs::rename(&partial, path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace file: {}", path.display()),
                e,
            ));
        }

        debug!(path = %path.display(), bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn create_dir(&self, path: &Path) -> AppResult<()> {
        fs::create_dir(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                AppError::with_source(
                    ErrorKind::Conflict,
                    format!("Directory already exists: {}", path.display()),
                    e,
                )
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create directory: {}", path.display()),
                    e,
                )
            }
        })
    }

    async fn create_dir_all(&self, path: &Path) -> AppResult<()> {
        fs::create_dir_all(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {}", path.display()),
                e,
            )
        })
    }

    async fn rename(&self, from: &Path, to: &Path) -> AppResult<()> {
        fs::rename(from, to).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to rename {} -> {}", from.display(), to.display()),
                e,
            )
        })
    }

    async fn delete(&self, path: &Path) -> AppResult<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {}", path.display()),
                e,
            )),
        }
    }

    async fn delete_dir(&self, path: &Path) -> AppResult<()> {
        match fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete directory: {}", path.display()),
                e,
            )),
        }
    }

    async fn exists(&self, path: &Path) -> AppResult<bool> {
        fs::try_exists(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to stat: {}", path.display()),
                e,
            )
        })
    }

    async fn metadata(&self, path: &Path) -> AppResult<StorageEntry> {
        let meta = fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Path not found: {}", path.display()))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to get metadata: {}", path.display()),
                    e,
                )
            }
        })?;

        Ok(StorageEntry {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            size_bytes: meta.len(),
            last_modified: meta.modified().ok().map(chrono::DateTime::<chrono::Utc>::from),
            is_directory: meta.is_dir(),
        })
    }

    async fn list(&self, path: &Path) -> AppResult<Vec<StorageEntry>> {
        let mut dir = match fs::read_dir(path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to list directory: {}", path.display()),
                    e,
                ));
            }
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let entry_meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
            })?;

            entries.push(StorageEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                size_bytes: entry_meta.len(),
                last_modified: entry_meta
                    .modified()
                    .ok()
                    .map(chrono::DateTime::<chrono::Utc>::from),
                is_directory: entry_meta.is_dir(),
            });
        }

        entries.sort_by(|a, b| {
            b.is_directory
                .cmp(&a.is_directory)
                .then(a.name.cmp(&b.name))
        });

        Ok(entries)
    }
}
