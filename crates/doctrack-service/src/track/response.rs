//! The answer returned to the document service.

use serde::{Deserialize, Serialize};

/// `{"error":0}` acknowledges a callback; `{"error":1}` asks the document
/// service to retry it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackResponse {
    /// 0 on success, 1 on failure.
    pub error: u8,
}

impl TrackResponse {
    /// Acknowledge.
    pub const OK: TrackResponse = TrackResponse { error: 0 };
    /// Ask for a retry.
    pub const FAILED: TrackResponse = TrackResponse { error: 1 };

    /// Whether the callback was handled.
    pub fn is_ok(&self) -> bool {
        self.error == 0
    }
}
