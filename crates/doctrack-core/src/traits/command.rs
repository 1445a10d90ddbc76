//! Document service command trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Commands understood by the document service command endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// Save the document without closing the editing session.
    ForceSave,
    /// Ask for a fresh status callback.
    Info,
    /// Disconnect users from the session.
    Drop,
    /// Update document metadata.
    Meta,
    /// Ask for the service version.
    Version,
}

/// A command addressed to one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCommand {
    /// Command name (`c` on the wire).
    #[serde(rename = "c")]
    pub kind: CommandKind,
    /// Document key identifying the editing session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Extra command arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl DocumentCommand {
    /// Builds a `forcesave` command for the session identified by `key`.
    pub fn force_save(key: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::ForceSave,
            key: Some(key.into()),
            meta: None,
        }
    }
}

/// The command endpoint's answer. `error == 0` means accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    /// Service error code.
    #[serde(default)]
    pub error: i64,
    /// Echoed document key.
    #[serde(default)]
    pub key: Option<String>,
}

/// Sends commands to the document service.
#[async_trait]
pub trait CommandClient: Send + Sync + std::fmt::Debug + 'static {
    /// Send `command` and return the service's reply.
    async fn send(&self, command: &DocumentCommand) -> AppResult<CommandReply>;
}
