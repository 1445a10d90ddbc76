//! Content downloads from URLs reported in callbacks.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use doctrack_core::config::DocServiceConfig;
use doctrack_core::error::{AppError, ErrorKind};
use doctrack_core::result::AppResult;
use doctrack_core::traits::fetcher::ContentFetcher;

/// Downloads content with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpContentFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpContentFetcher {
    /// Creates a fetcher using `docservice.timeout_seconds`.
    pub fn new(docservice: &DocServiceConfig) -> AppResult<Self> {
        let timeout = Duration::from_secs(docservice.timeout_seconds);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build download client: {e}")))?;
        Ok(Self { http, timeout })
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, uri: &str) -> AppResult<Bytes> {
        let response = self.http.get(uri).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("Download timed out after {}s", self.timeout.as_secs())
            } else {
                "Download failed".to_string()
            };
            AppError::with_source(ErrorKind::Download, message, e)
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::download(format!("Download returned HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Download, "Download interrupted", e))?;
        debug!(bytes = body.len(), "Downloaded content");
        Ok(body)
    }
}
