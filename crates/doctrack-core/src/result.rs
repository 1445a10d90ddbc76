//! Convenience result type alias for DocTrack.

use crate::error::AppError;

/// A specialized `Result` type for DocTrack operations.
pub type AppResult<T> = Result<T, AppError>;
