//! Token attachment for outbound requests.

use reqwest::RequestBuilder;
use serde_json::Value;

use doctrack_auth::JwtEncoder;
use doctrack_core::config::SignatureConfig;
use doctrack_core::result::AppResult;

/// Signs outbound request bodies when signing is enabled.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    encoder: Option<JwtEncoder>,
    header: String,
}

impl RequestSigner {
    /// Creates a signer; it does nothing unless `config.enabled`.
    pub fn new(config: &SignatureConfig) -> Self {
        Self {
            encoder: config.enabled.then(|| JwtEncoder::new(config)),
            header: config.header.clone(),
        }
    }

    /// Adds `token` to `body` and returns `request` carrying the body and
    /// the signature header.
    pub fn sign_json(&self, request: RequestBuilder, mut body: Value) -> AppResult<RequestBuilder> {
        let Some(encoder) = &self.encoder else {
            return Ok(request.json(&body));
        };

        let header_token = encoder.sign_payload(&body)?;
        let body_token = encoder.sign(&body)?;
        if let Value::Object(map) = &mut body {
            map.insert("token".to_string(), Value::String(body_token));
        }

        Ok(request
            .header(self.header.as_str(), format!("Bearer {header_token}"))
            .json(&body))
    }
}
