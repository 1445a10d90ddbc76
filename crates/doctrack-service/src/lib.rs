//! # doctrack-service
//!
//! Business logic for DocTrack. The track service turns callbacks from the
//! document service into version history entries and forcesave artifacts.
//!
//! Services follow constructor injection: storage, converter, fetcher, and
//! command client are provided at construction time via `Arc` references.

pub mod forcesave;
pub mod history;
pub mod track;

pub use forcesave::{ForcesaveOutcome, ForcesaveWriter};
pub use history::{VersionHistoryReader, VersionHistoryWriter, VersionWrite};
pub use track::{TrackResponse, TrackService};
