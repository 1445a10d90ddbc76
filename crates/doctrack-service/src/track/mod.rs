//! Callback handling.

pub mod response;
pub mod service;

pub use response::TrackResponse;
pub use service::TrackService;
