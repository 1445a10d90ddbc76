//! # doctrack-entity
//!
//! Domain models for DocTrack. The callback types mirror the JSON the
//! document service posts to the tracking endpoint; the document types
//! describe what ends up on disk. All models derive `Debug`, `Clone`,
//! `Serialize`, and `Deserialize`.

pub mod callback;
pub mod document;

pub use callback::{ActionType, CallbackEvent, CallbackStatus, ForcesaveType, UserAction};
pub use document::{DocumentMeta, DocumentRef, VersionId, VersionInfo};
