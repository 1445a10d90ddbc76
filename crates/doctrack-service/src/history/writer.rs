//! Commits new versions into a document's history directory.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use doctrack_core::error::{AppError, ErrorKind};
use doctrack_core::result::AppResult;
use doctrack_core::traits::StorageProvider;
use doctrack_entity::document::{DocumentMeta, DocumentRef, VersionId};
use doctrack_storage::StorageLayout;
use doctrack_storage::layout::parse_version_dir;

/// Everything needed to commit one version.
#[derive(Debug, Clone)]
pub struct VersionWrite {
    /// Document whose canonical file becomes the version's previous content.
    pub source: DocumentRef,
    /// Document the new content is stored under. Differs from `source` only
    /// when the content kept a format the source name does not describe.
    pub target: DocumentRef,
    /// New canonical content.
    pub content: Bytes,
    /// Diff archive of the editing session.
    pub diff: Option<Bytes>,
    /// Serialized change log.
    pub changes: Option<String>,
    /// Document key of the editing session.
    pub key: Option<String>,
}

/// Appends versions to history directories.
///
/// Creating the version directory is the only concurrency guard: two
/// writers racing for the same ordinal cannot both succeed. A directory
/// is only ever removed while it is the latest one, so an abandoned
/// ordinal below a committed version stays as an empty version.
#[derive(Debug, Clone)]
pub struct VersionHistoryWriter {
    storage: Arc<dyn StorageProvider>,
    layout: StorageLayout,
}

impl VersionHistoryWriter {
    /// Creates a writer over `storage` laid out by `layout`.
    pub fn new(storage: Arc<dyn StorageProvider>, layout: StorageLayout) -> Self {
        Self { storage, layout }
    }

    /// Number of versions stored for `doc`.
    pub async fn version_count(&self, doc: &DocumentRef) -> AppResult<u32> {
        Ok(self.stored_versions(doc).await?.len() as u32)
    }

    /// Ordinals of every version directory of `doc`, in ascending order.
    async fn stored_versions(&self, doc: &DocumentRef) -> AppResult<Vec<VersionId>> {
        let mut versions: Vec<VersionId> = self
            .storage
            .list(&self.layout.history_dir(doc))
            .await?
            .into_iter()
            .filter(|e| e.is_directory)
            .filter_map(|e| parse_version_dir(&e.name))
            .collect();
        versions.sort();
        Ok(versions)
    }

    /// Commits `request` as the next version of `request.target`.
    pub async fn write_version(&self, request: VersionWrite) -> AppResult<VersionId> {
        let VersionWrite {
            source,
            target,
            content,
            diff,
            changes,
            key,
        } = request;

        let versions = self.stored_versions(&target).await.map_err(as_history_error)?;
        let latest = versions.last().copied();
        if let Some(latest) = latest {
            if latest.get() as usize != versions.len() {
                return Err(AppError::history_write(format!(
                    "History of {target} is not contiguous: {} versions up to {latest}",
                    versions.len()
                )));
            }
        }
        let version = latest.map_or(VersionId::FIRST, VersionId::next);

        if let (Some(key), Some(latest)) = (key.as_deref(), latest) {
            if self.stored_key(&target, latest).await.as_deref() == Some(key) {
                return Err(AppError::history_write(format!(
                    "Version {latest} of {target} was already saved with key '{key}'"
                )));
            }
        }

        self.storage
            .create_dir_all(&self.layout.history_dir(&target))
            .await
            .map_err(as_history_error)?;

        let version_dir = self.layout.version_dir(&target, version);
        self.storage.create_dir(&version_dir).await.map_err(|e| {
            if e.kind == ErrorKind::Conflict {
                AppError::history_write(format!("Version {version} of {target} already exists"))
            } else {
                as_history_error(e)
            }
        })?;

        let canonical = self.layout.storage_path(&source);
        let prev = self.layout.prev_path(&target, version, &source.extension());
        if let Err(e) = self.storage.rename(&canonical, &prev).await {
            self.discard_version_dir(&target, version).await;
            return Err(AppError::history_write(format!(
                "Failed to move {source} into version {version}: {}",
                e.message
            )));
        }

        if let Err(e) = self
            .storage
            .write(&self.layout.storage_path(&target), content)
            .await
        {
            return Err(self.roll_back(&source, &target, version, e).await);
        }

        info!(
            file_name = %target.file_name,
            user_address = %target.user_address,
            version = %version,
            "Committed version"
        );

        if let Some(diff) = diff {
            self.persist("diff", &target, version, self.layout.diff_path(&target, version), diff)
                .await;
        }
        if let Some(changes) = changes {
            self.persist(
                "changes",
                &target,
                version,
                self.layout.changes_path(&target, version),
                Bytes::from(changes),
            )
            .await;
        }
        if let Some(key) = key {
            self.persist(
                "key",
                &target,
                version,
                self.layout.key_path(&target, version),
                Bytes::from(key),
            )
            .await;
        }

        self.drop_forcesave(&target).await;
        if source != target {
            self.drop_forcesave(&source).await;
        }

        Ok(version)
    }

    /// Stores ownership metadata next to the history of `doc`.
    pub async fn write_meta(&self, doc: &DocumentRef, meta: &DocumentMeta) -> AppResult<()> {
        let body = serde_json::to_vec_pretty(meta)?;
        self.storage
            .write(&self.layout.meta_path(doc), Bytes::from(body))
            .await
    }

    async fn stored_key(&self, doc: &DocumentRef, version: VersionId) -> Option<String> {
        self.storage
            .read_bytes(&self.layout.key_path(doc, version))
            .await
            .ok()
            .map(|raw| String::from_utf8_lossy(&raw).trim().to_string())
    }

    /// Puts the previous content back and removes the version directory.
    /// The directory is kept when the previous content could not be moved
    /// back, so nothing is lost.
    async fn roll_back(
        &self,
        source: &DocumentRef,
        target: &DocumentRef,
        version: VersionId,
        cause: AppError,
    ) -> AppError {
        let prev = self.layout.prev_path(target, version, &source.extension());
        let restored = self
            .storage
            .rename(&prev, &self.layout.storage_path(source))
            .await;
        let removed = match restored {
            Ok(()) => self.remove_if_latest(target, version).await,
            Err(e) => Err(e),
        };

        match removed {
            Ok(true) => {
                warn!(
                    file_name = %target.file_name,
                    user_address = %target.user_address,
                    version = %version,
                    error = %cause,
                    "Rolled back version after content write failed"
                );
                AppError::history_write(format!(
                    "Failed to store new content of {target}, version {version} rolled back: {}",
                    cause.message
                ))
            }
            Ok(false) => {
                warn!(
                    file_name = %target.file_name,
                    user_address = %target.user_address,
                    version = %version,
                    error = %cause,
                    "Restored previous content, version directory kept below a later version"
                );
                AppError::history_write(format!(
                    "Failed to store new content of {target}; version {version} left empty: {}",
                    cause.message
                ))
            }
            Err(rollback) => {
                warn!(
                    file_name = %target.file_name,
                    user_address = %target.user_address,
                    version = %version,
                    error = %cause,
                    rollback_error = %rollback,
                    "Rollback incomplete"
                );
                AppError::history_write(format!(
                    "Failed to store new content of {target}; version directory {version} is partial: {}",
                    cause.message
                ))
            }
        }
    }

    /// Removes the directory of `version` unless a later version exists,
    /// in which case removing it would open a gap. Returns whether the
    /// directory was removed.
    async fn remove_if_latest(&self, doc: &DocumentRef, version: VersionId) -> AppResult<bool> {
        if self.stored_versions(doc).await?.last() != Some(&version) {
            return Ok(false);
        }
        self.storage
            .delete_dir(&self.layout.version_dir(doc, version))
            .await?;
        Ok(true)
    }

    async fn discard_version_dir(&self, doc: &DocumentRef, version: VersionId) {
        match self.remove_if_latest(doc, version).await {
            Ok(true) => {}
            Ok(false) => warn!(
                file_name = %doc.file_name,
                version = %version,
                "Keeping empty version directory, a later version exists"
            ),
            Err(e) => warn!(version = %version, error = %e, "Failed to remove empty version directory"),
        }
    }

    /// Writes a version artifact. The content is committed at this point, so
    /// a failure only loses metadata.
    async fn persist(
        &self,
        step: &'static str,
        doc: &DocumentRef,
        version: VersionId,
        path: std::path::PathBuf,
        data: Bytes,
    ) {
        if let Err(e) = self.storage.write(&path, data).await {
            warn!(
                file_name = %doc.file_name,
                user_address = %doc.user_address,
                version = %version,
                step,
                error = %e,
                "Failed to store version artifact"
            );
        }
    }

    async fn drop_forcesave(&self, doc: &DocumentRef) {
        match self.storage.delete(&self.layout.forcesave_path(doc)).await {
            Ok(true) => debug!(file_name = %doc.file_name, "Removed superseded forcesave"),
            Ok(false) => {}
            Err(e) => warn!(
                file_name = %doc.file_name,
                user_address = %doc.user_address,
                error = %e,
                "Failed to remove forcesave artifact"
            ),
        }
    }
}

fn as_history_error(err: AppError) -> AppError {
    AppError::history_write(format!("History directory unavailable: {}", err.message))
}
