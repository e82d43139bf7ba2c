//! Slack API client module
//!
//! Encapsulates the Slack Web API calls the bot makes. Typed calls go through
//! slack-morphism; message posts and `response_url` replies are plain JSON over
//! reqwest so attachments and blocks can be passed through as built.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::{SlackApiConversationsHistoryRequest, SlackApiUsersInfoRequest};
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackUserId};
use std::time::Duration;
use tracing::{debug, warn};

use super::{ChatPlatform, UserDirectory};
use crate::core::models::HistoryEntry;
use crate::errors::BotError;

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a BotError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

fn connector() -> Result<&'static SlackHyperClient, BotError> {
    SLACK_CLIENT
        .as_ref()
        .ok_or_else(|| BotError::ApiError("Slack HTTP connector not initialized".to_string()))
}

/// Checks the `ok` flag of a Slack Web API response body.
///
/// # Errors
///
/// Returns `BotError::ApiError` naming `method` and Slack's error code.
pub fn ensure_ok(method: &str, body: &Value) -> Result<(), BotError> {
    if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(());
    }
    Err(BotError::ApiError(format!(
        "{} error: {}",
        method,
        body.get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    )))
}

/// Slack Web API client bound to one bot token
pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    /// # Errors
    ///
    /// Returns an error if `auth.test` fails.
    pub async fn get_bot_user_id(&self) -> Result<String, BotError> {
        let session = connector()?.open_session(&self.token);
        let test_resp = session.auth_test().await?;
        Ok(test_resp.user_id.0)
    }

    /// Real name, then display name, then the id itself.
    ///
    /// # Errors
    ///
    /// Returns an error if `users.info` fails, including for unknown users.
    pub async fn get_user_info(&self, user_id: &str) -> Result<String, BotError> {
        let session = connector()?.open_session(&self.token);
        let user_info_req = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_string()));
        let info = session.users_info(&user_info_req).await?;

        let name = info
            .user
            .profile
            .as_ref()
            .and_then(|p| p.real_name.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| {
                info.user
                    .profile
                    .as_ref()
                    .and_then(|p| p.display_name.clone())
                    .filter(|n| !n.is_empty())
            })
            .unwrap_or_else(|| user_id.to_string());

        Ok(name)
    }

    /// Most recent messages first, as `conversations.history` returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if `conversations.history` fails.
    pub async fn get_recent_messages(
        &self,
        channel_id: &str,
        count: u16,
    ) -> Result<Vec<HistoryEntry>, BotError> {
        let session = connector()?.open_session(&self.token);

        let request = SlackApiConversationsHistoryRequest::new()
            .with_channel(SlackChannelId(channel_id.to_string()))
            .with_limit(count.min(1000));

        let result = session.conversations_history(&request).await?;

        let entries: Vec<HistoryEntry> = result
            .messages
            .into_iter()
            .map(|msg| HistoryEntry {
                user_id: msg.sender.user.map(|u| u.0),
                text: msg.content.text.unwrap_or_default(),
                ts: msg.origin.ts.0,
            })
            .collect();

        debug!(
            channel_id = %channel_id,
            count = entries.len(),
            "fetched slack message history"
        );

        Ok(entries)
    }

    /// Post `message` (text, attachments, blocks) to `channel_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or Slack returns an error.
    pub async fn post_message_json(&self, channel_id: &str, message: &Value) -> Result<(), BotError> {
        let mut payload = message.clone();
        payload["channel"] = Value::String(channel_id.to_string());

        let resp = HTTP_CLIENT
            .post(POST_MESSAGE_URL)
            .bearer_auth(&self.token.token_value.0)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("Failed to post message: {e}")))?;

        if !resp.status().is_success() {
            return Err(BotError::ApiError(format!(
                "chat.postMessage HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp.json().await.map_err(|e| {
            BotError::ParseError(format!("chat.postMessage JSON parse error: {e}"))
        })?;

        ensure_ok("chat.postMessage", &body)
    }

    /// Send `payload` to an interaction's `response_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or returns a non-2xx status.
    pub async fn post_response_url(&self, response_url: &str, payload: &Value) -> Result<(), BotError> {
        let resp = HTTP_CLIENT
            .post(response_url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("response_url POST failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(BotError::ApiError(format!(
                "response_url POST failed: status={} body={}",
                status, body_text
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl UserDirectory for SlackClient {
    async fn user_display_name(&self, user_id: &str) -> Result<String, BotError> {
        self.get_user_info(user_id).await
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn channel_history(
        &self,
        channel_id: &str,
        limit: u16,
    ) -> Result<Vec<HistoryEntry>, BotError> {
        self.get_recent_messages(channel_id, limit).await
    }

    async fn post_message(&self, channel_id: &str, message: &Value) -> Result<(), BotError> {
        self.post_message_json(channel_id, message).await
    }

    async fn respond(&self, response_url: &str, payload: &Value) -> Result<(), BotError> {
        self.post_response_url(response_url, payload).await
    }
}
