//! Document storage configuration.

use serde::{Deserialize, Serialize};

/// Where documents, histories, and forcesave artifacts live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding one sub-directory per user address.
    #[serde(default = "default_root")]
    pub root: String,
    /// Public base URL of this server, used to build download links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            public_url: default_public_url(),
        }
    }
}

fn default_root() -> String {
    "./data/files".to_string()
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}
