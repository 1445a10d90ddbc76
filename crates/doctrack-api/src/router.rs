//! Route definitions for the DocTrack HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    Router::new()
        .merge(callback_routes())
        .merge(document_routes())
        .route("/health", get(handlers::health::health))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn callback_routes() -> Router<AppState> {
    Router::new().route("/track", post(handlers::track::track))
}

fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/download", get(handlers::download::download))
        .route("/history", get(handlers::history::history_file))
        .route("/history/versions", get(handlers::history::list_versions))
}
