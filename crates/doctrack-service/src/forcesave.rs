//! Forcesave artifacts and submitted-form documents.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use doctrack_core::result::AppResult;
use doctrack_core::traits::StorageProvider;
use doctrack_entity::callback::CallbackEvent;
use doctrack_entity::document::{DocumentMeta, DocumentRef};
use doctrack_storage::{StorageLayout, correct_name};

use crate::history::VersionHistoryWriter;

/// Description recorded for documents created from a submitted form.
pub const FORM_DESCRIPTION: &str = "Filling Form";

/// Where forcesaved content ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForcesaveOutcome {
    /// Stored as the forcesave artifact of this document.
    Artifact(DocumentRef),
    /// Stored as a new document created from a submitted form.
    FormDocument(DocumentRef),
}

/// Stores forcesaved content without touching version history.
#[derive(Debug, Clone)]
pub struct ForcesaveWriter {
    storage: Arc<dyn StorageProvider>,
    layout: StorageLayout,
    history: VersionHistoryWriter,
}

impl ForcesaveWriter {
    /// Creates a writer over `storage` laid out by `layout`.
    pub fn new(storage: Arc<dyn StorageProvider>, layout: StorageLayout) -> Self {
        let history = VersionHistoryWriter::new(storage.clone(), layout.clone());
        Self {
            storage,
            layout,
            history,
        }
    }

    /// Stores `content` forcesaved for `doc`.
    ///
    /// `kept_ext` is set when the content could not be converted to the
    /// document's format and still has this extension.
    pub async fn write(
        &self,
        doc: &DocumentRef,
        event: &CallbackEvent,
        content: Bytes,
        kept_ext: Option<&str>,
    ) -> AppResult<ForcesaveOutcome> {
        if event.is_submit_form() {
            return self.write_form(doc, event, content, kept_ext).await;
        }

        let target = match kept_ext {
            Some(ext) => {
                let desired = doc.sibling(doc.name_with_extension(ext));
                doc.sibling(correct_name(self.storage.as_ref(), &self.layout, &desired).await?)
            }
            None => doc.clone(),
        };

        self.storage
            .write(&self.layout.forcesave_path(&target), content)
            .await?;
        info!(
            file_name = %target.file_name,
            user_address = %target.user_address,
            "Stored forcesave artifact"
        );
        Ok(ForcesaveOutcome::Artifact(target))
    }

    async fn write_form(
        &self,
        doc: &DocumentRef,
        event: &CallbackEvent,
        content: Bytes,
        kept_ext: Option<&str>,
    ) -> AppResult<ForcesaveOutcome> {
        let ext = kept_ext.map(str::to_string).unwrap_or_else(|| doc.extension());
        let form_name = if ext.is_empty() {
            format!("{}-form", doc.stem())
        } else {
            format!("{}-form.{}", doc.stem(), ext)
        };
        let form = doc.sibling(correct_name(self.storage.as_ref(), &self.layout, &doc.sibling(form_name)).await?);

        let form_path = self.layout.storage_path(&form);
        self.storage.write(&form_path, content).await?;

        match event.acting_user() {
            Some(uid) => {
                let meta = DocumentMeta::now(uid, FORM_DESCRIPTION);
                if let Err(e) = self.history.write_meta(&form, &meta).await {
                    if let Err(cleanup) = self.storage.delete(&form_path).await {
                        warn!(
                            file_name = %form.file_name,
                            error = %cleanup,
                            "Failed to remove form document without metadata"
                        );
                    }
                    return Err(e);
                }
            }
            None => warn!(file_name = %form.file_name, "Submitted form carries no acting user"),
        }

        info!(
            file_name = %form.file_name,
            user_address = %form.user_address,
            source = %doc.file_name,
            "Created document from submitted form"
        );
        Ok(ForcesaveOutcome::FormDocument(form))
    }
}
