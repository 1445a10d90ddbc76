//! Application state shared across all handlers and middleware.

use std::path::PathBuf;
use std::sync::Arc;

use doctrack_auth::CallbackAuthenticator;
use doctrack_core::config::AppConfig;
use doctrack_core::traits::{CommandClient, ContentFetcher, DocumentConverter, StorageProvider};
use doctrack_service::{TrackService, VersionHistoryReader};
use doctrack_storage::StorageLayout;

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Document filesystem.
    pub storage: Arc<dyn StorageProvider>,
    /// Path mapping for documents.
    pub layout: StorageLayout,
    /// Inbound token verification.
    pub authenticator: Arc<CallbackAuthenticator>,
    /// Callback orchestration.
    pub track_service: Arc<TrackService>,
    /// Read access to version history.
    pub history_reader: Arc<VersionHistoryReader>,
}

impl AppState {
    /// Wires the state from configuration and document service clients.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn StorageProvider>,
        converter: Arc<dyn DocumentConverter>,
        fetcher: Arc<dyn ContentFetcher>,
        commands: Arc<dyn CommandClient>,
    ) -> Self {
        let layout = StorageLayout::new(PathBuf::from(&config.storage.root));
        let track_service = TrackService::new(
            Arc::clone(&storage),
            layout.clone(),
            converter,
            fetcher,
            commands,
        );
        let history_reader = VersionHistoryReader::new(Arc::clone(&storage), layout.clone());

        Self {
            authenticator: Arc::new(CallbackAuthenticator::new(&config.signature)),
            config: Arc::new(config),
            storage,
            layout,
            track_service: Arc::new(track_service),
            history_reader: Arc::new(history_reader),
        }
    }
}
