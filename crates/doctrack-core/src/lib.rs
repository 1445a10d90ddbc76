//! # doctrack-core
//!
//! Core crate for DocTrack. Contains the configuration schema, the
//! collaborator traits implemented against the document service,
//! revision key generation, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DocTrack crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
