//! Document identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A document as addressed by callbacks: a file name inside one user's
/// storage area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    /// File name including extension, without any directory part.
    pub file_name: String,
    /// Address of the user the document belongs to.
    pub user_address: String,
}

impl DocumentRef {
    /// Creates a reference, keeping only the last path component of
    /// `file_name`.
    pub fn new(file_name: impl AsRef<str>, user_address: impl Into<String>) -> Self {
        Self {
            file_name: base_file_name(file_name.as_ref()).to_string(),
            user_address: user_address.into(),
        }
    }

    /// Lowercase extension without the dot, empty if the name has none.
    pub fn extension(&self) -> String {
        split_name(&self.file_name)
            .1
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    /// The file name without its extension.
    pub fn stem(&self) -> &str {
        split_name(&self.file_name).0
    }

    /// The same document name carrying another extension.
    pub fn name_with_extension(&self, ext: &str) -> String {
        let ext = ext.trim_start_matches('.');
        if ext.is_empty() {
            self.stem().to_string()
        } else {
            format!("{}.{}", self.stem(), ext)
        }
    }

    /// Whether the name can be mapped onto a storage path at all.
    pub fn is_addressable(&self) -> bool {
        !self.file_name.trim().is_empty() && self.file_name != "." && self.file_name != ".."
    }

    /// A sibling document in the same user's storage area.
    pub fn sibling(&self, file_name: impl AsRef<str>) -> Self {
        Self::new(file_name, self.user_address.clone())
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.file_name, self.user_address)
    }
}

/// Strips any directory part, accepting both separators.
fn base_file_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Splits `name` at its last dot. Leading dots do not count as extensions.
fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
    }
}
