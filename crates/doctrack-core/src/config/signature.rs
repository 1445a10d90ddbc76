//! Token signing configuration.

use serde::{Deserialize, Serialize};

/// JWT signing and verification settings shared with the document service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Whether tokens are produced and checked at all.
    #[serde(default)]
    pub enabled: bool,
    /// Shared HMAC-SHA256 secret.
    #[serde(default = "default_secret")]
    pub secret: String,
    /// Header carrying `Bearer <token>` on inbound and outbound requests.
    #[serde(default = "default_header")]
    pub header: String,
    /// Whether inbound callbacks must carry a valid token.
    #[serde(default = "default_true")]
    pub use_for_request: bool,
    /// Lifetime of produced tokens in minutes.
    #[serde(default = "default_expires_in")]
    pub expires_in_minutes: u64,
    /// Clock skew tolerance in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            secret: default_secret(),
            header: default_header(),
            use_for_request: true,
            expires_in_minutes: default_expires_in(),
            leeway_seconds: default_leeway(),
        }
    }
}

fn default_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_header() -> String {
    "Authorization".to_string()
}

fn default_true() -> bool {
    true
}

fn default_expires_in() -> u64 {
    5
}

fn default_leeway() -> u64 {
    5
}
