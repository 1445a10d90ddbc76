//! Revision keys.
//!
//! A revision key names one state of one document towards the document
//! service. It doubles as the idempotency key of conversion requests, so
//! it must be a pure function of its seed: the same seed yields the same
//! key on every process, forever.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Longest key the document service accepts.
pub const MAX_KEY_LENGTH: usize = 128;

/// Number of digest bytes kept when a seed has to be hashed.
const HASHED_KEY_BYTES: usize = 20;

/// A derived, URL-safe document/conversion key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionKey(String);

impl RevisionKey {
    /// Derive a key from an arbitrary seed.
    ///
    /// Seeds longer than [`MAX_KEY_LENGTH`] are replaced by a hex SHA-256
    /// prefix; every character outside `[0-9A-Za-z._=-]` becomes `_`.
    pub fn generate(seed: &str) -> Self {
        let source = if seed.len() > MAX_KEY_LENGTH {
            let digest = Sha256::digest(seed.as_bytes());
            digest[..HASHED_KEY_BYTES]
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<String>()
        } else {
            seed.to_string()
        };

        let key: String = source
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '=') {
                    c
                } else {
                    '_'
                }
            })
            .take(MAX_KEY_LENGTH)
            .collect();

        Self(key)
    }

    /// Key for converting a callback download.
    pub fn for_download(download_uri: &str) -> Self {
        Self::generate(download_uri)
    }

    /// Key for one saved state of a stored document.
    ///
    /// Combines who the document belongs to, where it is served from,
    /// and when it was last written, so every save yields a new key.
    pub fn for_document(user_address: &str, file_uri: &str, modified: DateTime<Utc>) -> Self {
        Self::generate(&format!(
            "{user_address}/{file_uri}/{}",
            modified.timestamp_millis()
        ))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RevisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RevisionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
