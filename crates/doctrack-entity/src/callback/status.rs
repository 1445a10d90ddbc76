//! Numeric enumerations carried by callbacks.
//!
//! Every enum here is closed over the codes the document service documents
//! and keeps an explicit catch-all variant, so decoding never fails on a
//! code introduced by a newer service.

use serde::{Deserialize, Serialize};

/// Editing session state reported by a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum CallbackStatus {
    /// The document is being edited.
    Editing,
    /// Editing finished; the document must be saved.
    MustSave,
    /// Saving failed inside the editor; the last good state must be saved.
    Corrupted,
    /// Editing finished without changes.
    Closed,
    /// A save was requested while editing continues.
    MustForceSave,
    /// A forced save failed inside the editor; the last good state is sent.
    CorruptedForceSave,
    /// Any other code.
    Unknown(i64),
}

impl CallbackStatus {
    /// The status code on the wire.
    pub fn code(&self) -> i64 {
        match self {
            Self::Editing => 1,
            Self::MustSave => 2,
            Self::Corrupted => 3,
            Self::Closed => 4,
            Self::MustForceSave => 6,
            Self::CorruptedForceSave => 7,
            Self::Unknown(code) => *code,
        }
    }

    /// Return the status as a lowercase string for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::MustSave => "must_save",
            Self::Corrupted => "corrupted",
            Self::Closed => "closed",
            Self::MustForceSave => "must_force_save",
            Self::CorruptedForceSave => "corrupted_force_save",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<i64> for CallbackStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Editing,
            2 => Self::MustSave,
            3 => Self::Corrupted,
            4 => Self::Closed,
            6 => Self::MustForceSave,
            7 => Self::CorruptedForceSave,
            other => Self::Unknown(other),
        }
    }
}

impl From<CallbackStatus> for i64 {
    fn from(status: CallbackStatus) -> Self {
        status.code()
    }
}

/// What triggered a forced save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ForcesaveType {
    /// Requested through the command service.
    Command,
    /// The user pressed the save button.
    Button,
    /// Periodic autosave timer.
    Timer,
    /// A form was submitted; the result becomes a new document.
    SubmitForm,
    /// Any other code.
    Other(i64),
}

impl From<i64> for ForcesaveType {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Command,
            1 => Self::Button,
            2 => Self::Timer,
            3 => Self::SubmitForm,
            other => Self::Other(other),
        }
    }
}

impl From<ForcesaveType> for i64 {
    fn from(kind: ForcesaveType) -> Self {
        match kind {
            ForcesaveType::Command => 0,
            ForcesaveType::Button => 1,
            ForcesaveType::Timer => 2,
            ForcesaveType::SubmitForm => 3,
            ForcesaveType::Other(code) => code,
        }
    }
}

/// A user's action inside the editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ActionType {
    /// The user left the session.
    Disconnected,
    /// The user joined the session.
    Connected,
    /// The user pressed the forcesave button.
    ForceSaveRequested,
    /// Any other code.
    Other(i64),
}

impl From<i64> for ActionType {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Disconnected,
            1 => Self::Connected,
            2 => Self::ForceSaveRequested,
            other => Self::Other(other),
        }
    }
}

impl From<ActionType> for i64 {
    fn from(action: ActionType) -> Self {
        match action {
            ActionType::Disconnected => 0,
            ActionType::Connected => 1,
            ActionType::ForceSaveRequested => 2,
            ActionType::Other(code) => code,
        }
    }
}
