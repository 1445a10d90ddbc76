//! Stored document models.

pub mod meta;
pub mod model;
pub mod version;

pub use meta::DocumentMeta;
pub use model::DocumentRef;
pub use version::{VersionId, VersionInfo};
