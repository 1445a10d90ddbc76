//! JWT token creation with configurable signing and TTL.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use serde_json::Value;

use doctrack_core::config::SignatureConfig;
use doctrack_core::error::AppError;

use super::claims::PayloadClaims;

/// Creates signed HS256 tokens for outbound requests and download links.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token TTL in minutes.
    ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from signature configuration.
    pub fn new(config: &SignatureConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            ttl_minutes: config.expires_in_minutes as i64,
        }
    }

    /// Signs `claims` as they are, stamping `iat` and `exp` when the claims
    /// are a JSON object that lacks them.
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AppError> {
        let mut value = serde_json::to_value(claims)?;
        if let Value::Object(map) = &mut value {
            let now = Utc::now();
            let exp = now + chrono::Duration::minutes(self.ttl_minutes);
            map.entry("iat").or_insert_with(|| now.timestamp().into());
            map.entry("exp").or_insert_with(|| exp.timestamp().into());
        }

        encode(&Header::default(), &value, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Signs `body` wrapped as `{"payload": body}`, the shape expected in
    /// the signature header.
    pub fn sign_payload<T: Serialize>(&self, body: &T) -> Result<String, AppError> {
        self.sign(&PayloadClaims::new(body))
    }
}
