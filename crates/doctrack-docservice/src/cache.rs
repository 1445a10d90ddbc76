//! Reuse of completed conversions.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use doctrack_core::config::DocServiceConfig;
use doctrack_core::result::AppResult;
use doctrack_core::traits::converter::{ConversionOutcome, ConversionRequest, DocumentConverter};

/// Remembers completed conversions by revision key and target format so
/// that repeated callbacks for the same change do not convert twice.
/// Unfinished and failed conversions are never cached.
#[derive(Debug)]
pub struct CachedConverter<C> {
    inner: C,
    cache: Cache<String, ConversionOutcome>,
}

impl<C: DocumentConverter> CachedConverter<C> {
    /// Wraps `inner` with a cache sized from configuration.
    pub fn new(inner: C, config: &DocServiceConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.conversion_cache_capacity)
            .time_to_live(Duration::from_secs(config.conversion_cache_ttl_seconds))
            .build();
        Self { inner, cache }
    }

    fn cache_key(request: &ConversionRequest) -> String {
        format!("{}:{}", request.key, request.target_ext)
    }
}

#[async_trait]
impl<C: DocumentConverter> DocumentConverter for CachedConverter<C> {
    async fn convert(&self, request: &ConversionRequest) -> AppResult<ConversionOutcome> {
        let key = Self::cache_key(request);
        if let Some(hit) = self.cache.get(&key).await {
            debug!(key = %request.key, "Reusing completed conversion");
            return Ok(hit);
        }

        let outcome = self.inner.convert(request).await?;
        if outcome.completed_uri().is_some() {
            self.cache.insert(key, outcome.clone()).await;
        }
        Ok(outcome)
    }
}
