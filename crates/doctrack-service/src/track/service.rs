//! Orchestrates save, force-save, and editing callbacks.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, error, info, warn};

use doctrack_core::error::AppError;
use doctrack_core::traits::{
    CommandClient, ContentFetcher, ConversionRequest, DocumentCommand, DocumentConverter,
    StorageProvider,
};
use doctrack_core::types::RevisionKey;
use doctrack_entity::callback::{CallbackEvent, CallbackStatus};
use doctrack_entity::document::{DocumentRef, VersionId};
use doctrack_storage::{StorageLayout, correct_name};

use crate::forcesave::{ForcesaveOutcome, ForcesaveWriter};
use crate::history::{VersionHistoryWriter, VersionWrite};

use super::response::TrackResponse;

/// A failed processing step.
#[derive(Debug)]
struct StepFailure {
    step: &'static str,
    error: AppError,
}

trait AtStep<T> {
    fn at_step(self, step: &'static str) -> Result<T, StepFailure>;
}

impl<T> AtStep<T> for Result<T, AppError> {
    fn at_step(self, step: &'static str) -> Result<T, StepFailure> {
        self.map_err(|error| StepFailure { step, error })
    }
}

/// Content to store after the conversion decision.
#[derive(Debug)]
struct ResolvedContent {
    /// Where to download it from.
    uri: String,
    /// Set when conversion failed and the content keeps this extension.
    kept_ext: Option<String>,
}

/// Handles callbacks for stored documents.
#[derive(Debug, Clone)]
pub struct TrackService {
    storage: Arc<dyn StorageProvider>,
    layout: StorageLayout,
    converter: Arc<dyn DocumentConverter>,
    fetcher: Arc<dyn ContentFetcher>,
    commands: Arc<dyn CommandClient>,
    history: VersionHistoryWriter,
    forcesave: ForcesaveWriter,
}

impl TrackService {
    /// Creates a new track service.
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        layout: StorageLayout,
        converter: Arc<dyn DocumentConverter>,
        fetcher: Arc<dyn ContentFetcher>,
        commands: Arc<dyn CommandClient>,
    ) -> Self {
        Self {
            history: VersionHistoryWriter::new(storage.clone(), layout.clone()),
            forcesave: ForcesaveWriter::new(storage.clone(), layout.clone()),
            storage,
            layout,
            converter,
            fetcher,
            commands,
        }
    }

    /// Processes one callback and returns the answer for the document
    /// service. Failures are logged here and never escape.
    pub async fn handle(&self, doc: &DocumentRef, event: &CallbackEvent) -> TrackResponse {
        debug!(
            file_name = %doc.file_name,
            user_address = %doc.user_address,
            status = event.status.as_str(),
            "Handling callback"
        );

        let result = match event.status {
            CallbackStatus::Editing => {
                self.on_editing(doc, event).await;
                Ok(())
            }
            CallbackStatus::MustSave | CallbackStatus::Corrupted => {
                self.process_save(doc, event).await.map(|version| {
                    info!(
                        file_name = %doc.file_name,
                        user_address = %doc.user_address,
                        version = %version,
                        "Saved document"
                    );
                })
            }
            CallbackStatus::MustForceSave | CallbackStatus::CorruptedForceSave => {
                self.process_force_save(doc, event).await.map(|_| ())
            }
            CallbackStatus::Closed | CallbackStatus::Unknown(_) => {
                debug!(status = event.status.code(), "Nothing to do for callback");
                Ok(())
            }
        };

        match result {
            Ok(()) => TrackResponse::OK,
            Err(failure) => {
                error!(
                    file_name = %doc.file_name,
                    user_address = %doc.user_address,
                    status = event.status.as_str(),
                    step = failure.step,
                    error = %failure.error,
                    "Callback processing failed"
                );
                TrackResponse::FAILED
            }
        }
    }

    /// Asks the document service to save as soon as a user leaves, so their
    /// edits are not held until the whole session closes.
    async fn on_editing(&self, doc: &DocumentRef, event: &CallbackEvent) {
        let Some(user) = event.departed_user() else {
            return;
        };
        let Some(key) = event.key.as_deref() else {
            warn!(file_name = %doc.file_name, "Editing callback carries no key");
            return;
        };

        match self.commands.send(&DocumentCommand::force_save(key)).await {
            Ok(reply) if reply.error == 0 => {
                info!(file_name = %doc.file_name, user, "Requested forcesave after user left")
            }
            Ok(reply) => warn!(
                file_name = %doc.file_name,
                user,
                code = reply.error,
                "Forcesave command refused"
            ),
            Err(e) => warn!(
                file_name = %doc.file_name,
                user_address = %doc.user_address,
                step = "command",
                error = %e,
                "Forcesave command failed"
            ),
        }
    }

    async fn process_save(
        &self,
        doc: &DocumentRef,
        event: &CallbackEvent,
    ) -> Result<VersionId, StepFailure> {
        let resolved = self.resolve_content(doc, event).await?;

        let target = match resolved.kept_ext.as_deref() {
            Some(ext) => {
                let desired = doc.sibling(doc.name_with_extension(ext));
                let name = correct_name(self.storage.as_ref(), &self.layout, &desired)
                    .await
                    .at_step("naming")?;
                doc.sibling(name)
            }
            None => doc.clone(),
        };

        let content = self.fetcher.fetch(&resolved.uri).await.at_step("download")?;
        let diff = self.fetch_diff(doc, event).await;

        self.history
            .write_version(VersionWrite {
                source: doc.clone(),
                target,
                content,
                diff,
                changes: event.change_log(),
                key: event.key.clone(),
            })
            .await
            .at_step("history")
    }

    async fn process_force_save(
        &self,
        doc: &DocumentRef,
        event: &CallbackEvent,
    ) -> Result<ForcesaveOutcome, StepFailure> {
        let resolved = self.resolve_content(doc, event).await?;
        let content = self.fetcher.fetch(&resolved.uri).await.at_step("download")?;

        self.forcesave
            .write(doc, event, content, resolved.kept_ext.as_deref())
            .await
            .at_step("forcesave")
    }

    /// Decides whether the reported content must be converted to the
    /// document's format, and converts it.
    async fn resolve_content(
        &self,
        doc: &DocumentRef,
        event: &CallbackEvent,
    ) -> Result<ResolvedContent, StepFailure> {
        let url = event
            .download_url()
            .ok_or_else(|| AppError::validation("Callback carries no download url"))
            .at_step("url")?;

        let current_ext = doc.extension();
        let download_ext = event
            .content_extension()
            .unwrap_or_else(|| current_ext.clone());

        if download_ext == current_ext {
            return Ok(ResolvedContent {
                uri: url.to_string(),
                kept_ext: None,
            });
        }

        let request = ConversionRequest::new(
            url,
            download_ext.as_str(),
            current_ext.as_str(),
            RevisionKey::for_download(url).into_string(),
        );
        match self.converter.convert(&request).await {
            Ok(outcome) => {
                if let Some(uri) = outcome.completed_uri() {
                    return Ok(ResolvedContent {
                        uri: uri.to_string(),
                        kept_ext: None,
                    });
                }
                warn!(
                    file_name = %doc.file_name,
                    user_address = %doc.user_address,
                    step = "convert",
                    percent = outcome.percent,
                    "Conversion did not finish, keeping original format"
                );
            }
            Err(e) => warn!(
                file_name = %doc.file_name,
                user_address = %doc.user_address,
                step = "convert",
                error = %e,
                "Conversion failed, keeping original format"
            ),
        }

        Ok(ResolvedContent {
            uri: url.to_string(),
            kept_ext: Some(download_ext),
        })
    }

    /// Downloads the session's diff archive. A missing diff never fails
    /// the save.
    async fn fetch_diff(&self, doc: &DocumentRef, event: &CallbackEvent) -> Option<Bytes> {
        let changes_url = event.changesurl.as_deref().filter(|u| !u.trim().is_empty())?;
        match self.fetcher.fetch(changes_url).await {
            Ok(diff) => Some(diff),
            Err(e) => {
                warn!(
                    file_name = %doc.file_name,
                    user_address = %doc.user_address,
                    step = "diff",
                    error = %e,
                    "Diff download failed"
                );
                None
            }
        }
    }
}
