//! All Slack-specific functionality

pub mod bot;
pub mod client;
pub mod listener;
pub mod response_builder;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::models::HistoryEntry;
use crate::errors::BotError;

// Re-export main types for convenience
pub use bot::{BotSettings, SlackBot};
pub use client::SlackClient;

/// Resolves user ids to human-readable names.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the user cannot be looked up.
    async fn user_display_name(&self, user_id: &str) -> Result<String, BotError>;
}

/// The chat operations the handlers rely on.
#[async_trait]
pub trait ChatPlatform: UserDirectory {
    /// Messages in `channel_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be fetched.
    async fn channel_history(
        &self,
        channel_id: &str,
        limit: u16,
    ) -> Result<Vec<HistoryEntry>, BotError>;

    /// # Errors
    ///
    /// Returns an error if the message cannot be posted.
    async fn post_message(&self, channel_id: &str, message: &Value) -> Result<(), BotError>;

    /// # Errors
    ///
    /// Returns an error if the `response_url` rejects the payload.
    async fn respond(&self, response_url: &str, payload: &Value) -> Result<(), BotError>;
}
