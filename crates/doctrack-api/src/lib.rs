//! # doctrack-api
//!
//! HTTP API layer for DocTrack built on Axum.
//!
//! Provides the callback endpoint used by the document service, signed
//! download and history endpoints, request logging, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
