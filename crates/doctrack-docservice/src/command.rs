//! HTTP client for the command endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use doctrack_core::config::{DocServiceConfig, SignatureConfig};
use doctrack_core::error::{AppError, ErrorKind};
use doctrack_core::result::AppResult;
use doctrack_core::traits::command::{CommandClient, CommandReply, DocumentCommand};

use crate::signing::RequestSigner;

/// Sends session commands such as `forcesave` to the document service.
#[derive(Debug, Clone)]
pub struct HttpCommandClient {
    http: reqwest::Client,
    url: String,
    signer: RequestSigner,
}

impl HttpCommandClient {
    /// Creates a client from service and signature configuration.
    pub fn new(docservice: &DocServiceConfig, signature: &SignatureConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(docservice.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build command client: {e}")))?;

        Ok(Self {
            http,
            url: docservice.command_url(),
            signer: RequestSigner::new(signature),
        })
    }
}

#[async_trait]
impl CommandClient for HttpCommandClient {
    async fn send(&self, command: &DocumentCommand) -> AppResult<CommandReply> {
        let body = serde_json::to_value(command)?;
        debug!(command = ?command.kind, key = ?command.key, "Sending document command");

        let response = self
            .signer
            .sign_json(self.http.post(&self.url), body)?
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    ErrorKind::Timeout
                } else {
                    ErrorKind::ServiceUnavailable
                };
                AppError::with_source(kind, "Command request failed", e)
            })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Command endpoint returned HTTP {}",
                response.status()
            )));
        }

        response.json::<CommandReply>().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed command reply", e)
        })
    }
}
