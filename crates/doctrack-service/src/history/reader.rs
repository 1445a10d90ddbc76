//! Read access to stored versions.

use std::sync::Arc;

use bytes::Bytes;

use doctrack_core::error::AppError;
use doctrack_core::result::AppResult;
use doctrack_core::traits::StorageProvider;
use doctrack_entity::document::{DocumentMeta, DocumentRef, VersionId, VersionInfo};
use doctrack_storage::StorageLayout;
use doctrack_storage::layout::{CHANGES_FILE, DIFF_FILE, KEY_FILE, parse_version_dir};

/// Lists versions and serves their artifacts.
#[derive(Debug, Clone)]
pub struct VersionHistoryReader {
    storage: Arc<dyn StorageProvider>,
    layout: StorageLayout,
}

impl VersionHistoryReader {
    /// Creates a reader over `storage` laid out by `layout`.
    pub fn new(storage: Arc<dyn StorageProvider>, layout: StorageLayout) -> Self {
        Self { storage, layout }
    }

    /// Every stored version of `doc`, oldest first.
    pub async fn list_versions(&self, doc: &DocumentRef) -> AppResult<Vec<VersionInfo>> {
        let mut versions: Vec<VersionId> = self
            .storage
            .list(&self.layout.history_dir(doc))
            .await?
            .into_iter()
            .filter(|e| e.is_directory)
            .filter_map(|e| parse_version_dir(&e.name))
            .collect();
        versions.sort();

        let mut infos = Vec::with_capacity(versions.len());
        for version in versions {
            infos.push(self.version_info(doc, version).await?);
        }
        Ok(infos)
    }

    /// Reads one artifact of a version. Only `prev.<ext>`, the diff
    /// archive, the change log, and the key file can be read.
    pub async fn read_artifact(
        &self,
        doc: &DocumentRef,
        version: VersionId,
        name: &str,
    ) -> AppResult<Bytes> {
        if !is_artifact_name(name) {
            return Err(AppError::validation(format!(
                "'{name}' is not a version artifact"
            )));
        }
        self.storage
            .read_bytes(&self.layout.version_dir(doc, version).join(name))
            .await
    }

    /// Ownership metadata of `doc`, if any was recorded.
    pub async fn read_meta(&self, doc: &DocumentRef) -> AppResult<Option<DocumentMeta>> {
        let path = self.layout.meta_path(doc);
        if !self.storage.exists(&path).await? {
            return Ok(None);
        }
        let raw = self.storage.read_bytes(&path).await?;
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    async fn version_info(&self, doc: &DocumentRef, version: VersionId) -> AppResult<VersionInfo> {
        let dir = self.layout.version_dir(doc, version);
        let entries = self.storage.list(&dir).await?;

        let key = match entries.iter().find(|e| e.name == KEY_FILE) {
            Some(_) => {
                let raw = self.storage.read_bytes(&dir.join(KEY_FILE)).await?;
                Some(String::from_utf8_lossy(&raw).trim().to_string())
            }
            None => None,
        };

        let changes = match entries.iter().find(|e| e.name == CHANGES_FILE) {
            Some(_) => {
                let raw = self.storage.read_bytes(&dir.join(CHANGES_FILE)).await?;
                serde_json::from_slice(&raw).ok()
            }
            None => None,
        };

        let created = self
            .storage
            .metadata(&dir)
            .await
            .ok()
            .and_then(|m| m.last_modified);

        Ok(VersionInfo {
            version,
            key,
            changes,
            created,
            prev_file: entries
                .iter()
                .find(|e| !e.is_directory && is_prev_name(&e.name))
                .map(|e| e.name.clone()),
            has_diff: entries.iter().any(|e| e.name == DIFF_FILE),
        })
    }
}

fn is_prev_name(name: &str) -> bool {
    match name.strip_prefix("prev") {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('.')
            .is_some_and(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())),
        None => false,
    }
}

fn is_artifact_name(name: &str) -> bool {
    name == DIFF_FILE || name == CHANGES_FILE || name == KEY_FILE || is_prev_name(name)
}
