use serde::{Deserialize, Serialize};

use crate::errors::BotError;

/// Who can see a reply to a slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Ephemeral,
    InChannel,
}

impl Visibility {
    /// The value Slack expects in `response_type`.
    #[must_use]
    pub fn response_type(self) -> &'static str {
        match self {
            Visibility::Ephemeral => "ephemeral",
            Visibility::InChannel => "in_channel",
        }
    }
}

/// Prompt/response pair carried in the "Post publicly" button value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepostPayload {
    pub prompt: String,
    pub response: String,
}

impl RepostPayload {
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn to_button_value(&self) -> Result<String, BotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// # Errors
    ///
    /// Returns `BotError::ParseError` if `value` is not a JSON object with
    /// string `prompt` and `response` fields.
    pub fn from_button_value(value: &str) -> Result<Self, BotError> {
        serde_json::from_str(value)
            .map_err(|e| BotError::ParseError(format!("Invalid repost payload: {}", e)))
    }
}

/// A slash command invocation, stripped of SDK types.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub command: String,
    pub text: String,
    pub user_id: String,
    pub channel_id: String,
    pub channel_name: Option<String>,
    pub response_url: String,
}

impl CommandInvocation {
    /// DMs can't receive a public repost from an ephemeral preview.
    #[must_use]
    pub fn is_direct_message(&self) -> bool {
        self.channel_name.as_deref() == Some("directmessage") || self.channel_id.starts_with('D')
    }
}

/// A button click on a private preview.
#[derive(Debug, Clone)]
pub struct RepostAction {
    pub user_id: String,
    pub channel_id: String,
    pub value: String,
    pub response_url: String,
}

/// An incoming message event.
#[derive(Debug, Clone, Default)]
pub struct DirectMessage {
    pub channel_id: String,
    pub user_id: Option<String>,
    pub bot_id: Option<String>,
    /// Edits, joins, deletions and other non-plain messages.
    pub has_subtype: bool,
    pub text: String,
}

/// One message from `conversations.history`, newest first as Slack returns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub user_id: Option<String>,
    pub text: String,
    pub ts: String,
}
