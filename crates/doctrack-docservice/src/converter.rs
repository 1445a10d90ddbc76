//! HTTP client for the conversion endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use doctrack_core::config::{DocServiceConfig, SignatureConfig};
use doctrack_core::error::AppError;
use doctrack_core::result::AppResult;
use doctrack_core::traits::converter::{ConversionOutcome, ConversionRequest, DocumentConverter};

use crate::error::ConversionError;
use crate::signing::RequestSigner;

/// Answer of the conversion endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertResponse {
    #[serde(default)]
    end_convert: bool,
    #[serde(default)]
    percent: Option<u8>,
    #[serde(default)]
    file_url: Option<String>,
    #[serde(default)]
    file_type: Option<String>,
    #[serde(default)]
    error: Option<i64>,
}

impl ConvertResponse {
    fn into_outcome(self) -> Result<ConversionOutcome, ConversionError> {
        if let Some(code) = self.error.filter(|c| *c != 0) {
            return Err(ConversionError::from_code(code));
        }

        if self.end_convert {
            let uri = self
                .file_url
                .filter(|u| !u.is_empty())
                .ok_or_else(|| ConversionError::MalformedResponse("missing fileUrl".into()))?;
            return Ok(ConversionOutcome {
                percent: 100,
                uri: Some(uri),
                file_type: self.file_type,
            });
        }

        Ok(ConversionOutcome {
            percent: self.percent.unwrap_or(0).min(99),
            uri: None,
            file_type: self.file_type,
        })
    }
}

/// Converts documents through the document service's conversion endpoint.
#[derive(Debug, Clone)]
pub struct HttpConversionClient {
    http: reqwest::Client,
    url: String,
    signer: RequestSigner,
}

impl HttpConversionClient {
    /// Creates a client from service and signature configuration.
    pub fn new(docservice: &DocServiceConfig, signature: &SignatureConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(docservice.convert_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build conversion client: {e}"))
            })?;

        Ok(Self {
            http,
            url: docservice.converter_url(),
            signer: RequestSigner::new(signature),
        })
    }
}

/// Title sent along with the request: the last path segment of the URI.
fn title_for(request: &ConversionRequest) -> String {
    let path = request.source_uri.split(['?', '#']).next().unwrap_or_default();
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() && name.contains('.') => name.to_string(),
        _ => format!("{}.{}", request.key, request.source_ext),
    }
}

#[async_trait]
impl DocumentConverter for HttpConversionClient {
    async fn convert(&self, request: &ConversionRequest) -> AppResult<ConversionOutcome> {
        if request.is_identity() {
            return Ok(ConversionOutcome::passthrough(request));
        }

        let body = json!({
            "async": request.is_async,
            "filetype": request.source_ext,
            "outputtype": request.target_ext,
            "key": request.key,
            "url": request.source_uri,
            "title": title_for(request),
        });

        debug!(
            key = %request.key,
            from = %request.source_ext,
            to = %request.target_ext,
            "Requesting conversion"
        );

        let builder = self
            .http
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json");
        let response = self
            .signer
            .sign_json(builder, body)?
            .send()
            .await
            .map_err(|e| ConversionError::from_transport(&e))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), key = %request.key, "Conversion request rejected");
            return Err(ConversionError::Status(response.status().as_u16()).into());
        }

        let answer: ConvertResponse = response
            .json()
            .await
            .map_err(|e| ConversionError::MalformedResponse(e.to_string()))?;

        Ok(answer.into_outcome()?)
    }
}
