//! Document conversion trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A single conversion request.
///
/// Extensions are lowercase and carry no leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// URI the conversion service downloads the source from.
    pub source_uri: String,
    /// Extension of the source content.
    pub source_ext: String,
    /// Extension the caller wants back.
    pub target_ext: String,
    /// Revision key; identical keys let the service reuse earlier work.
    pub key: String,
    /// Whether the service may answer before the conversion finished.
    pub is_async: bool,
}

impl ConversionRequest {
    /// Creates a synchronous request.
    pub fn new(
        source_uri: impl Into<String>,
        source_ext: impl Into<String>,
        target_ext: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        let source_ext: String = source_ext.into();
        let target_ext: String = target_ext.into();
        Self {
            source_uri: source_uri.into(),
            source_ext: source_ext.trim_start_matches('.').to_lowercase(),
            target_ext: target_ext.trim_start_matches('.').to_lowercase(),
            key: key.into(),
            is_async: false,
        }
    }

    /// Source and target formats are identical, so nothing has to run.
    pub fn is_identity(&self) -> bool {
        self.source_ext == self.target_ext
    }
}

/// What the conversion service reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Progress from 0 to 100.
    pub percent: u8,
    /// Location of the converted content, present once `percent == 100`.
    pub uri: Option<String>,
    /// Extension of the converted content.
    pub file_type: Option<String>,
}

impl ConversionOutcome {
    /// The outcome of a bypassed conversion: the source, unchanged.
    pub fn passthrough(request: &ConversionRequest) -> Self {
        Self {
            percent: 100,
            uri: Some(request.source_uri.clone()),
            file_type: Some(request.target_ext.clone()),
        }
    }

    /// The converted URI, if the conversion has finished.
    pub fn completed_uri(&self) -> Option<&str> {
        if self.percent >= 100 {
            self.uri.as_deref()
        } else {
            None
        }
    }
}

/// Converts documents between formats through an external service.
///
/// Implementations perform one attempt per call and must be safe to call
/// concurrently for different keys. Retrying is the caller's decision.
#[async_trait]
pub trait DocumentConverter: Send + Sync + std::fmt::Debug + 'static {
    /// Convert `request.source_uri` into `request.target_ext`.
    async fn convert(&self, request: &ConversionRequest) -> AppResult<ConversionOutcome>;
}
