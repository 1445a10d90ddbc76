//! Document editing service configuration.

use serde::{Deserialize, Serialize};

/// Settings for talking to the external document editing/conversion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocServiceConfig {
    /// Base URL of the document service, with trailing slash.
    #[serde(default = "default_url")]
    pub url: String,
    /// Path of the conversion endpoint, relative to `url`.
    #[serde(default = "default_converter_path")]
    pub converter_path: String,
    /// Path of the command endpoint, relative to `url`.
    #[serde(default = "default_command_path")]
    pub command_path: String,
    /// Timeout for content and diff downloads, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Timeout for a single conversion request, in seconds.
    #[serde(default = "default_convert_timeout")]
    pub convert_timeout_seconds: u64,
    /// Maximum number of completed conversions remembered by revision key.
    #[serde(default = "default_cache_capacity")]
    pub conversion_cache_capacity: u64,
    /// How long a completed conversion is reused, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub conversion_cache_ttl_seconds: u64,
}

impl DocServiceConfig {
    /// Absolute URL of the conversion endpoint.
    pub fn converter_url(&self) -> String {
        join_url(&self.url, &self.converter_path)
    }

    /// Absolute URL of the command endpoint.
    pub fn command_url(&self) -> String {
        join_url(&self.url, &self.command_path)
    }
}

impl Default for DocServiceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            converter_path: default_converter_path(),
            command_path: default_command_path(),
            timeout_seconds: default_timeout(),
            convert_timeout_seconds: default_convert_timeout(),
            conversion_cache_capacity: default_cache_capacity(),
            conversion_cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn default_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_converter_path() -> String {
    "ConvertService.ashx".to_string()
}

fn default_command_path() -> String {
    "coauthoring/CommandService.ashx".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_convert_timeout() -> u64 {
    120
}

fn default_cache_capacity() -> u64 {
    1_000
}

fn default_cache_ttl() -> u64 {
    600
}
