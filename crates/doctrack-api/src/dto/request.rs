//! Query parameters of the HTTP endpoints.

use serde::Deserialize;

use doctrack_entity::document::DocumentRef;

/// `POST /track?filename=&useraddress=`
#[derive(Debug, Clone, Deserialize)]
pub struct TrackQuery {
    /// Document file name.
    pub filename: String,
    /// Owner's address.
    pub useraddress: String,
}

impl TrackQuery {
    /// The addressed document.
    pub fn document(&self) -> DocumentRef {
        DocumentRef::new(&self.filename, self.useraddress.clone())
    }
}

/// `GET /download?fileName=&useraddress=[&forcesave=true]`
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadQuery {
    /// Document file name.
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Owner's address.
    pub useraddress: String,
    /// Prefer the forcesave artifact when one exists.
    #[serde(default)]
    pub forcesave: bool,
}

impl DownloadQuery {
    /// The addressed document.
    pub fn document(&self) -> DocumentRef {
        DocumentRef::new(&self.file_name, self.useraddress.clone())
    }
}

/// `GET /history?fileName=&useraddress=&ver=&file=`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryFileQuery {
    /// Document file name.
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Owner's address.
    pub useraddress: String,
    /// Version ordinal.
    pub ver: u32,
    /// Artifact name inside the version.
    pub file: String,
}

impl HistoryFileQuery {
    /// The addressed document.
    pub fn document(&self) -> DocumentRef {
        DocumentRef::new(&self.file_name, self.useraddress.clone())
    }
}

/// `GET /history/versions?fileName=&useraddress=`
#[derive(Debug, Clone, Deserialize)]
pub struct VersionsQuery {
    /// Document file name.
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Owner's address.
    pub useraddress: String,
}

impl VersionsQuery {
    /// The addressed document.
    pub fn document(&self) -> DocumentRef {
        DocumentRef::new(&self.file_name, self.useraddress.clone())
    }
}
