//! Document ownership metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who created a document and when. Stored next to the document's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Id of the creating user.
    pub uid: String,
    /// Display name of the creator.
    pub name: String,
}

impl DocumentMeta {
    /// Metadata for a document created now.
    pub fn now(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            created: Utc::now(),
            uid: uid.into(),
            name: name.into(),
        }
    }
}
