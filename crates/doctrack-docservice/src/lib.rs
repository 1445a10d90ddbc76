//! # doctrack-docservice
//!
//! Clients for the external document service: format conversion, session
//! commands, and content downloads. Every outbound request is bounded by a
//! timeout and, when signing is enabled, carries a token both in the body
//! and in the signature header.

pub mod cache;
pub mod command;
pub mod converter;
pub mod error;
pub mod fetcher;
pub mod signing;

pub use cache::CachedConverter;
pub use command::HttpCommandClient;
pub use converter::HttpConversionClient;
pub use error::ConversionError;
pub use fetcher::HttpContentFetcher;
pub use signing::RequestSigner;
