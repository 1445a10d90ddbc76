//! Response DTOs.

use serde::{Deserialize, Serialize};

use doctrack_entity::document::{DocumentMeta, VersionInfo};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// History listing of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionListResponse {
    /// Document file name.
    pub file_name: String,
    /// Ordinal the current canonical file will get once superseded.
    pub current_version: u32,
    /// Document key of the current canonical file.
    pub key: String,
    /// Stored versions, oldest first.
    pub versions: Vec<VersionInfo>,
    /// Ownership metadata, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<DocumentMeta>,
}
