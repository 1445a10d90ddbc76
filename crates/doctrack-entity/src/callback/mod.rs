//! Callback notifications sent by the document service.

pub mod event;
pub mod status;

pub use event::{CallbackEvent, UserAction};
pub use status::{ActionType, CallbackStatus, ForcesaveType};
