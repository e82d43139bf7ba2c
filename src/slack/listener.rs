//! Socket Mode listener.
//!
//! Slack pushes commands, button clicks and message events over a WebSocket.
//! Each envelope is acknowledged right away and the matching handler runs on
//! its own task, so a slow completion never blows Slack's 3 second ack window.
//! Handler failures are logged and dropped; the connection stays up.

use slack_morphism::prelude::*;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::SlackBot;
use crate::api::interactive_handler::is_repost_action;
use crate::api::{handle_ai_command, handle_direct_message, handle_public_repost};
use crate::core::models::{CommandInvocation, DirectMessage, RepostAction};
use crate::errors::BotError;

fn log_dropped(event_kind: &str, error: &BotError) {
    error!(event_kind = event_kind, error = %error, "upstream call failed, dropping event");
}

async fn bot_from_state(states: &SlackClientEventsUserState) -> Result<Arc<SlackBot>, BotError> {
    let guard = states.read().await;
    guard
        .get_user_state::<Arc<SlackBot>>()
        .cloned()
        .ok_or_else(|| BotError::ConfigError("bot missing from listener state".to_string()))
}

// ============================================================================
// SDK event conversion
// ============================================================================

#[must_use]
pub fn command_invocation(event: &SlackCommandEvent) -> CommandInvocation {
    CommandInvocation {
        command: event.command.0.clone(),
        text: event.text.clone().unwrap_or_default(),
        user_id: event.user_id.0.clone(),
        channel_id: event.channel_id.0.clone(),
        channel_name: event.channel_name.clone(),
        response_url: event.response_url.0.to_string(),
    }
}

/// The repost clicks in a block actions payload. Clicks without a
/// `response_url` cannot delete their preview and are skipped.
#[must_use]
pub fn repost_actions(event: &SlackInteractionBlockActionsEvent) -> Vec<RepostAction> {
    let Some(response_url) = event.response_url.as_ref().map(|u| u.0.to_string()) else {
        warn!("block action without response_url, ignoring");
        return Vec::new();
    };
    let channel_id = event
        .channel
        .as_ref()
        .map(|c| c.id.0.clone())
        .unwrap_or_default();
    let user_id = event
        .user
        .as_ref()
        .map(|u| u.id.0.clone())
        .unwrap_or_default();

    event
        .actions
        .iter()
        .flatten()
        .filter(|action| is_repost_action(&action.action_id.0))
        .map(|action| RepostAction {
            user_id: user_id.clone(),
            channel_id: channel_id.clone(),
            value: action.value.clone().unwrap_or_default(),
            response_url: response_url.clone(),
        })
        .collect()
}

#[must_use]
pub fn direct_message(event: &SlackMessageEvent) -> DirectMessage {
    DirectMessage {
        channel_id: event
            .origin
            .channel
            .as_ref()
            .map(|c| c.0.clone())
            .unwrap_or_default(),
        user_id: event.sender.user.as_ref().map(|u| u.0.clone()),
        bot_id: event.sender.bot_id.as_ref().map(|b| b.0.clone()),
        has_subtype: event.subtype.is_some(),
        text: event
            .content
            .as_ref()
            .and_then(|c| c.text.clone())
            .unwrap_or_default(),
    }
}

// ============================================================================
// Callbacks (plain fns, slack-morphism stores them as fn pointers)
// ============================================================================

async fn on_command_event(
    event: SlackCommandEvent,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> UserCallbackResult<SlackCommandEventResponse> {
    let bot = bot_from_state(&states).await?;
    let invocation = command_invocation(&event);

    if invocation.command != bot.settings().command {
        warn!(command = %invocation.command, "slash command not handled by this bot");
        return Ok(SlackCommandEventResponse {
            content: SlackMessageContent::new()
                .with_text(format!("`{}` is not handled here.", invocation.command)),
            response_type: Some(SlackMessageResponseType::Ephemeral),
        });
    }

    tokio::spawn(async move {
        if let Err(e) = handle_ai_command(&bot, &invocation).await {
            log_dropped("slash_command", &e);
        }
    });

    Ok(SlackCommandEventResponse {
        content: SlackMessageContent::new(),
        response_type: Some(SlackMessageResponseType::Ephemeral),
    })
}

async fn on_interaction_event(
    event: SlackInteractionEvent,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> UserCallbackResult<()> {
    let SlackInteractionEvent::BlockActions(block_actions) = event else {
        debug!("received non-block-action interaction event, ignoring");
        return Ok(());
    };

    let bot = bot_from_state(&states).await?;
    for action in repost_actions(&block_actions) {
        let bot = bot.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_public_repost(&bot, &action).await {
                log_dropped("public_repost", &e);
            }
        });
    }

    Ok(())
}

async fn on_push_event(
    event: SlackPushEventCallback,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> UserCallbackResult<()> {
    let SlackEventCallbackBody::Message(message_event) = event.event else {
        return Ok(());
    };

    let bot = bot_from_state(&states).await?;
    let message = direct_message(&message_event);

    tokio::spawn(async move {
        if let Err(e) = handle_direct_message(&bot, &message).await {
            log_dropped("direct_message", &e);
        }
    });

    Ok(())
}

fn on_listener_error(
    err: Box<dyn std::error::Error + Send + Sync>,
    _client: Arc<SlackHyperClient>,
    _states: SlackClientEventsUserState,
) -> HttpStatusCode {
    warn!(error = %err, "slack socket mode error");
    HttpStatusCode::OK
}

// ============================================================================
// Main loop
// ============================================================================

/// Connect with the app-level token and serve until the process is signalled.
///
/// Returns the listener's exit code.
///
/// # Errors
///
/// Returns an error if the connector cannot be built or the initial
/// connection fails.
pub async fn run(bot: SlackBot, app_token: &str) -> Result<i32, BotError> {
    let client = Arc::new(SlackHyperClient::new(
        SlackClientHyperConnector::new()
            .map_err(|e| BotError::ApiError(format!("Failed to create Slack connector: {e}")))?,
    ));

    let callbacks = SlackSocketModeListenerCallbacks::new()
        .with_command_events(on_command_event)
        .with_interaction_events(on_interaction_event)
        .with_push_events(on_push_event);

    let listener_environment = Arc::new(
        SlackClientEventsListenerEnvironment::new(client)
            .with_error_handler(on_listener_error)
            .with_user_state(Arc::new(bot)),
    );

    let listener = SlackClientSocketModeListener::new(
        &SlackClientSocketModeConfig::new(),
        listener_environment,
        callbacks,
    );

    let app_token = SlackApiToken::new(SlackApiTokenValue(app_token.to_string()));
    listener.listen_for(&app_token).await?;
    info!("slack socket mode connected");

    Ok(listener.serve().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn command_event(channel_id: &str, channel_name: Option<&str>) -> SlackCommandEvent {
        let mut body = json!({
            "team_id": "T1",
            "channel_id": channel_id,
            "user_id": "U1",
            "command": "/ai",
            "text": "say hi",
            "response_url": "https://hooks.slack.com/commands/T1/1/abc",
            "trigger_id": "13345224609.738474920.8088930838d88f008e0"
        });
        if let Some(name) = channel_name {
            body["channel_name"] = Value::String(name.to_string());
        }
        serde_json::from_value(body).unwrap()
    }

    fn block_actions(actions: Value, response_url: Option<&str>) -> SlackInteractionBlockActionsEvent {
        let mut body = json!({
            "team": {"id": "T1"},
            "user": {"id": "U7"},
            "api_app_id": "A1",
            "container": {"type": "message", "message_ts": "1700000000.000100"},
            "trigger_id": "13345224609.738474920.8088930838d88f008e0",
            "channel": {"id": "C100", "name": "general"},
            "actions": actions
        });
        if let Some(url) = response_url {
            body["response_url"] = Value::String(url.to_string());
        }
        serde_json::from_value(body).unwrap()
    }

    fn message_event(body: Value) -> SlackMessageEvent {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn command_keeps_channel_name_for_dm_detection() {
        let invocation = command_invocation(&command_event("G123", Some("directmessage")));

        assert_eq!(invocation.channel_name.as_deref(), Some("directmessage"));
        assert!(invocation.is_direct_message());
    }

    #[test]
    fn command_fields_are_copied() {
        let invocation = command_invocation(&command_event("C100", Some("general")));

        assert_eq!(invocation.command, "/ai");
        assert_eq!(invocation.text, "say hi");
        assert_eq!(invocation.user_id, "U1");
        assert_eq!(invocation.channel_id, "C100");
        assert_eq!(
            invocation.response_url,
            "https://hooks.slack.com/commands/T1/1/abc"
        );
        assert!(!invocation.is_direct_message());
    }

    #[test]
    fn command_without_text_or_channel_name() {
        let mut event = command_event("D200", None);
        event.text = None;

        let invocation = command_invocation(&event);

        assert_eq!(invocation.text, "");
        assert_eq!(invocation.channel_name, None);
        assert!(invocation.is_direct_message());
    }

    #[test]
    fn only_repost_clicks_become_actions() {
        let event = block_actions(
            json!([
                {"type": "button", "action_id": "public_repost", "value": "{\"prompt\":\"P\",\"response\":\"R\"}"},
                {"type": "button", "action_id": "open_settings", "value": "x"}
            ]),
            Some("https://hooks.slack.com/actions/T1/2/xyz"),
        );

        let actions = repost_actions(&event);

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].user_id, "U7");
        assert_eq!(actions[0].channel_id, "C100");
        assert_eq!(actions[0].value, "{\"prompt\":\"P\",\"response\":\"R\"}");
        assert_eq!(
            actions[0].response_url,
            "https://hooks.slack.com/actions/T1/2/xyz"
        );
    }

    #[test]
    fn clicks_without_response_url_are_skipped() {
        let event = block_actions(
            json!([{"type": "button", "action_id": "public_repost", "value": "{}"}]),
            None,
        );

        assert!(repost_actions(&event).is_empty());
    }

    #[test]
    fn plain_dm_maps_user_and_text() {
        let message = direct_message(&message_event(json!({
            "ts": "1700000000.000200",
            "channel": "D42",
            "channel_type": "im",
            "user": "U1",
            "text": "what's 2+2?"
        })));

        assert_eq!(message.channel_id, "D42");
        assert_eq!(message.user_id.as_deref(), Some("U1"));
        assert_eq!(message.bot_id, None);
        assert!(!message.has_subtype);
        assert_eq!(message.text, "what's 2+2?");
    }

    #[test]
    fn bot_messages_carry_subtype_and_bot_id() {
        let message = direct_message(&message_event(json!({
            "ts": "1700000000.000300",
            "channel": "D42",
            "subtype": "bot_message",
            "bot_id": "B1",
            "text": "4"
        })));

        assert_eq!(message.user_id, None);
        assert_eq!(message.bot_id.as_deref(), Some("B1"));
        assert!(message.has_subtype);
    }
}
