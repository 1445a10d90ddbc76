//! Claims shapes exchanged with the document service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried in header tokens: the request body sits under `payload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadClaims<T> {
    /// The signed request body.
    pub payload: T,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Query parameters of the signed request, when the signer included them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<SignedQuery>,
}

/// Document address signed along with a header token. Each value, when
/// present, overrides the unsigned request query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedQuery {
    /// Owner's address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub useraddress: Option<String>,
    /// Document file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl<T> PayloadClaims<T> {
    /// Wraps a body without timestamps; the encoder stamps them.
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            iat: None,
            exp: None,
            query: None,
        }
    }

    /// Returns the expiration as a `DateTime<Utc>`, if any.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}
