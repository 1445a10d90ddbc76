//! Content download trait.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Fetches document content from URLs reported by the document service.
///
/// Implementations must bound every request with a timeout and fail with
/// [`ErrorKind::Download`](crate::error::ErrorKind::Download) on transport
/// errors or non-200 answers.
#[async_trait]
pub trait ContentFetcher: Send + Sync + std::fmt::Debug + 'static {
    /// Download the full body behind `uri`.
    async fn fetch(&self, uri: &str) -> AppResult<Bytes>;
}
