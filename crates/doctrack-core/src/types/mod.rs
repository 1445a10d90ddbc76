//! Core type definitions used across the DocTrack workspace.

pub mod revision;

pub use revision::RevisionKey;
