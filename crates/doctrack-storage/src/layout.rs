//! Storage path resolution.
//!
//! ```text
//! <root>/<user>/<file>                        canonical file
//! <root>/<user>/<file>-hist/<ver>/prev.<ext>  previous content
//! <root>/<user>/<file>-hist/<ver>/diff.zip
//! <root>/<user>/<file>-hist/<ver>/changes.json
//! <root>/<user>/<file>-hist/<ver>/key.txt
//! <root>/<user>/<file>-hist/createdInfo.json  document metadata
//! <root>/<user>/forcesave/<file>              forcesave artifact
//! ```

use std::path::{Path, PathBuf};

use doctrack_entity::document::{DocumentRef, VersionId};

/// Suffix appended to a file name to form its history directory.
pub const HISTORY_SUFFIX: &str = "-hist";
/// Directory holding forcesave artifacts inside a user's area.
pub const FORCESAVE_DIR: &str = "forcesave";
/// Diff archive inside a version directory.
pub const DIFF_FILE: &str = "diff.zip";
/// Change log inside a version directory.
pub const CHANGES_FILE: &str = "changes.json";
/// Document key inside a version directory.
pub const KEY_FILE: &str = "key.txt";
/// Metadata file inside a history directory.
pub const META_FILE: &str = "createdInfo.json";

/// Stateless mapping from documents to filesystem paths.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Root directory holding one directory per user address.
    root: PathBuf,
}

impl StorageLayout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A user's storage area.
    pub fn user_dir(&self, user_address: &str) -> PathBuf {
        self.root.join(sanitize_user_address(user_address))
    }

    /// The canonical file of a document.
    pub fn storage_path(&self, doc: &DocumentRef) -> PathBuf {
        self.user_dir(&doc.user_address).join(&doc.file_name)
    }

    /// The directory holding a document's versions.
    pub fn history_dir(&self, doc: &DocumentRef) -> PathBuf {
        self.user_dir(&doc.user_address)
            .join(format!("{}{}", doc.file_name, HISTORY_SUFFIX))
    }

    /// The directory of one version.
    pub fn version_dir(&self, doc: &DocumentRef, version: VersionId) -> PathBuf {
        self.history_dir(doc).join(version.to_string())
    }

    /// Previous content stored in a version, named after `ext`.
    pub fn prev_path(&self, doc: &DocumentRef, version: VersionId, ext: &str) -> PathBuf {
        self.version_dir(doc, version).join(prev_file_name(ext))
    }

    /// Diff archive of a version.
    pub fn diff_path(&self, doc: &DocumentRef, version: VersionId) -> PathBuf {
        self.version_dir(doc, version).join(DIFF_FILE)
    }

    /// Change log of a version.
    pub fn changes_path(&self, doc: &DocumentRef, version: VersionId) -> PathBuf {
        self.version_dir(doc, version).join(CHANGES_FILE)
    }

    /// Document key of a version.
    pub fn key_path(&self, doc: &DocumentRef, version: VersionId) -> PathBuf {
        self.version_dir(doc, version).join(KEY_FILE)
    }

    /// Ownership metadata of a document.
    pub fn meta_path(&self, doc: &DocumentRef) -> PathBuf {
        self.history_dir(doc).join(META_FILE)
    }

    /// The forcesave artifact of a document.
    pub fn forcesave_path(&self, doc: &DocumentRef) -> PathBuf {
        self.user_dir(&doc.user_address)
            .join(FORCESAVE_DIR)
            .join(&doc.file_name)
    }
}

/// `prev.<ext>`, or `prev` for names without an extension.
pub fn prev_file_name(ext: &str) -> String {
    let ext = ext.trim_start_matches('.');
    if ext.is_empty() {
        "prev".to_string()
    } else {
        format!("prev.{ext}")
    }
}

/// Parses a version directory name. Anything that is not a positive
/// integer is not a version.
pub fn parse_version_dir(name: &str) -> Option<VersionId> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse::<u32>()
        .ok()
        .filter(|v| *v > 0)
        .map(VersionId)
}

/// Maps a user address onto a single safe directory name.
fn sanitize_user_address(user_address: &str) -> String {
    let cleaned: String = user_address
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}
