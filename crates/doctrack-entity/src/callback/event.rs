//! The callback payload.

use serde::{Deserialize, Serialize};

use super::status::{ActionType, CallbackStatus, ForcesaveType};

/// One entry of the callback's `actions` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAction {
    /// What the user did.
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Who did it.
    pub userid: String,
}

/// A status notification posted by the document service.
///
/// Field names follow the wire format. Unknown fields (including an
/// embedded `token`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackEvent {
    /// Session state.
    pub status: CallbackStatus,
    /// Document key of the editing session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Where the edited content can be downloaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Extension of the content behind `url`, without a dot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filetype: Option<String>,
    /// Where the diff archive of this editing session can be downloaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changesurl: Option<String>,
    /// Serialized change log (legacy form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changeshistory: Option<String>,
    /// Structured change log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<serde_json::Value>,
    /// Users currently in the session.
    #[serde(default)]
    pub users: Vec<String>,
    /// Actions that triggered this callback.
    #[serde(default)]
    pub actions: Vec<UserAction>,
    /// Trigger of a forced save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forcesavetype: Option<ForcesaveType>,
}

impl CallbackEvent {
    /// Creates an event with only a status set.
    pub fn new(status: CallbackStatus) -> Self {
        Self {
            status,
            key: None,
            url: None,
            filetype: None,
            changesurl: None,
            changeshistory: None,
            history: None,
            users: Vec::new(),
            actions: Vec::new(),
            forcesavetype: None,
        }
    }

    /// The download URL, if one was sent and it is not blank.
    pub fn download_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// The reported content extension, lowercase and without a dot.
    pub fn content_extension(&self) -> Option<String> {
        self.filetype
            .as_deref()
            .map(|t| t.trim().trim_start_matches('.').to_lowercase())
            .filter(|t| !t.is_empty())
    }

    /// The change log to persist with a version.
    ///
    /// `changeshistory` wins when present; otherwise the structured
    /// `history` object is serialized.
    pub fn change_log(&self) -> Option<String> {
        if let Some(raw) = self.changeshistory.as_deref().filter(|s| !s.is_empty()) {
            return Some(raw.to_string());
        }
        self.history
            .as_ref()
            .filter(|h| !h.is_null())
            .and_then(|h| serde_json::to_string_pretty(h).ok())
    }

    /// Whether this forced save came from a submitted form.
    pub fn is_submit_form(&self) -> bool {
        self.forcesavetype == Some(ForcesaveType::SubmitForm)
    }

    /// The user who performed the first action, if any.
    pub fn acting_user(&self) -> Option<&str> {
        self.actions.first().map(|a| a.userid.as_str())
    }

    /// The user who just left the session and is no longer in the roster.
    pub fn departed_user(&self) -> Option<&str> {
        let action = self.actions.first()?;
        if action.action_type != ActionType::Disconnected {
            return None;
        }
        if self.users.iter().any(|u| u == &action.userid) {
            return None;
        }
        Some(action.userid.as_str())
    }
}
