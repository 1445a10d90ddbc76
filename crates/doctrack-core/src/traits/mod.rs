//! Core traits defined in `doctrack-core` and implemented by other crates.
//!
//! The orchestrator only sees these seams. The HTTP implementations live in
//! `doctrack-docservice`, the filesystem one in `doctrack-storage`.

pub mod command;
pub mod converter;
pub mod fetcher;
pub mod storage;

pub use command::{CommandClient, CommandKind, CommandReply, DocumentCommand};
pub use converter::{ConversionOutcome, ConversionRequest, DocumentConverter};
pub use fetcher::ContentFetcher;
pub use storage::{StorageEntry, StorageProvider};
