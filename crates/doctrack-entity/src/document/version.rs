//! Version identifiers and listings.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 1-based ordinal of a stored version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(pub u32);

impl VersionId {
    /// The first version of any document.
    pub const FIRST: VersionId = VersionId(1);

    /// The ordinal that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Return the inner ordinal.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of one stored version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// Version ordinal.
    pub version: VersionId,
    /// Document key that was valid when the version was saved.
    pub key: Option<String>,
    /// Parsed change log, if one was stored and is valid JSON.
    pub changes: Option<serde_json::Value>,
    /// When the version directory was written.
    pub created: Option<DateTime<Utc>>,
    /// File name of the previous content inside the version directory.
    pub prev_file: Option<String>,
    /// Whether a diff archive was stored.
    pub has_diff: bool,
}
