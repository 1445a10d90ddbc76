//! Verification of inbound callback tokens.
//!
//! The document service signs a callback either in the `token` field of the
//! JSON body, whose claims are the whole callback, or in the signature
//! header as `Bearer <token>`, whose claims carry the callback under
//! `payload` and may sign the document address under `query`. The body
//! token wins when both are present.

use serde_json::Value;
use tracing::debug;

use doctrack_core::config::SignatureConfig;
use doctrack_core::error::AppError;

use crate::jwt::{JwtDecoder, PayloadClaims, SignedQuery};

const BEARER_PREFIX: &str = "Bearer ";

/// Strips the `Bearer ` prefix of a signature header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let token = header_value
        .strip_prefix(BEARER_PREFIX)
        .unwrap_or(header_value)
        .trim();
    if token.is_empty() { None } else { Some(token) }
}

/// A callback body that passed verification.
#[derive(Debug, Clone, PartialEq)]
pub struct TrustedCallback {
    /// The callback to process.
    pub body: Value,
    /// Signed document address, which takes precedence over the request
    /// query.
    pub query: Option<SignedQuery>,
}

impl TrustedCallback {
    fn unsigned(body: Value) -> Self {
        Self { body, query: None }
    }
}

/// Checks inbound callbacks against the shared secret.
#[derive(Debug, Clone)]
pub struct CallbackAuthenticator {
    decoder: JwtDecoder,
    required: bool,
    header: String,
}

impl CallbackAuthenticator {
    /// Creates an authenticator; it is a pass-through unless both signing
    /// and request verification are enabled.
    pub fn new(config: &SignatureConfig) -> Self {
        Self {
            decoder: JwtDecoder::new(config),
            required: config.enabled && config.use_for_request,
            header: config.header.clone(),
        }
    }

    /// Whether inbound requests must be signed.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Name of the header that may carry the token.
    pub fn header_name(&self) -> &str {
        &self.header
    }

    /// Returns the trusted callback.
    ///
    /// With verification disabled the body is returned unchanged. Otherwise
    /// the verified claims replace the body; a missing or invalid token is
    /// an authentication error.
    pub fn authenticate(
        &self,
        body: Value,
        header_value: Option<&str>,
    ) -> Result<TrustedCallback, AppError> {
        if !self.required {
            return Ok(TrustedCallback::unsigned(body));
        }

        if let Some(token) = body.get("token").and_then(Value::as_str) {
            debug!("Verifying callback body token");
            return self.decoder.decode::<Value>(token).map(TrustedCallback::unsigned);
        }

        let token = header_value
            .and_then(bearer_token)
            .ok_or_else(|| AppError::authentication("Expected JWT"))?;
        debug!("Verifying callback header token");
        let claims: PayloadClaims<Value> = self
            .decoder
            .decode(token)
            .map_err(|e| AppError::authentication(e.message))?;
        Ok(TrustedCallback {
            body: claims.payload,
            query: claims.query,
        })
    }

    /// Verifies a bare header value, for endpoints without a JSON body.
    pub fn authorize_header(&self, header_value: Option<&str>) -> Result<(), AppError> {
        if !self.required {
            return Ok(());
        }
        let token = header_value
            .and_then(bearer_token)
            .ok_or_else(|| AppError::authentication("Expected JWT"))?;
        self.decoder.decode::<Value>(token).map(|_| ())
    }
}
