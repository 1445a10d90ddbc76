//! Version history: committing new versions and reading them back.

pub mod reader;
pub mod writer;

pub use reader::VersionHistoryReader;
pub use writer::{VersionHistoryWriter, VersionWrite};
