//! Application builder: wires configuration, document service clients,
//! storage, and the router into a running server.

use std::sync::Arc;

use axum::Router;

use doctrack_core::config::AppConfig;
use doctrack_core::error::{AppError, ErrorKind};
use doctrack_docservice::{
    CachedConverter, HttpCommandClient, HttpContentFetcher, HttpConversionClient,
};
use doctrack_storage::LocalStorageProvider;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Creates the storage root and the document service clients.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    tokio::fs::create_dir_all(&config.storage.root)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root {}", config.storage.root),
                e,
            )
        })?;

    let converter = CachedConverter::new(
        HttpConversionClient::new(&config.docservice, &config.signature)?,
        &config.docservice,
    );
    let fetcher = HttpContentFetcher::new(&config.docservice)?;
    let commands = HttpCommandClient::new(&config.docservice, &config.signature)?;

    tracing::info!(
        docservice = %config.docservice.url,
        storage_root = %config.storage.root,
        signing = config.signature.enabled,
        "Document service clients ready"
    );

    Ok(AppState::new(
        config,
        Arc::new(LocalStorageProvider::new()),
        Arc::new(converter),
        Arc::new(fetcher),
        Arc::new(commands),
    ))
}

/// Runs the DocTrack server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocTrack server...");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_app(build_state(config).await?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("DocTrack server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("DocTrack server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C, shutting down");
    }
}
