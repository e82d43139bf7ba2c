//! Handler for the `/ai` slash command.
//!
//! `/ai <prompt>` answers privately with a "Post publicly" button;
//! `/ai say <prompt>` answers in the channel for everyone.

use tracing::{info, warn};

use crate::ai::CompletionOverrides;
use crate::core::models::{CommandInvocation, RepostPayload, Visibility};
use crate::errors::BotError;
use crate::slack::SlackBot;
use crate::slack::response_builder::{
    MAX_BUTTON_VALUE_LEN, create_command_reply_payload, create_ephemeral_payload,
};

// ============================================================================
// Command Parsing
// ============================================================================

/// Leading keyword that makes the reply public.
pub const SAY_KEYWORD: &str = "say";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub visibility: Visibility,
    /// Text forwarded to the model.
    pub prompt: &'a str,
}

/// Splits off a leading `say` and picks the reply visibility.
#[must_use]
pub fn parse_command_text(text: &str) -> ParsedCommand<'_> {
    let trimmed = text.trim_start();
    let (first, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));

    if first == SAY_KEYWORD {
        ParsedCommand {
            visibility: Visibility::InChannel,
            prompt: rest.trim_start(),
        }
    } else {
        ParsedCommand {
            visibility: Visibility::Ephemeral,
            prompt: text,
        }
    }
}

#[must_use]
pub fn format_prompt_line(user_name: &str, command: &str, text: &str) -> String {
    format!("{user_name} asked: {command} {text}")
}

/// Only private answers outside DMs can be promoted.
#[must_use]
pub fn should_offer_repost(visibility: Visibility, is_direct_message: bool) -> bool {
    visibility == Visibility::Ephemeral && !is_direct_message
}

/// Serialized button value, or `None` when it would exceed Slack's limit.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized.
pub fn repost_button_value(prompt_line: &str, response: &str) -> Result<Option<String>, BotError> {
    let value = RepostPayload {
        prompt: prompt_line.to_string(),
        response: response.to_string(),
    }
    .to_button_value()?;

    if value.chars().count() > MAX_BUTTON_VALUE_LEN {
        warn!(
            value_len = value.chars().count(),
            "repost payload too long for a button value, omitting button"
        );
        return Ok(None);
    }
    Ok(Some(value))
}

// ============================================================================
// Main Entry Point
// ============================================================================

/// Answer a slash command through its `response_url`.
///
/// # Errors
///
/// Returns an error if the user lookup, completion request, or reply fails.
pub async fn handle_ai_command(bot: &SlackBot, invocation: &CommandInvocation) -> Result<(), BotError> {
    let parsed = parse_command_text(&invocation.text);

    if parsed.prompt.trim().is_empty() {
        info!(user_id = %invocation.user_id, "empty prompt, sending usage hint");
        let usage = format!("Usage: {} [say] <prompt>", invocation.command);
        return bot
            .platform()
            .respond(&invocation.response_url, &create_ephemeral_payload(&usage))
            .await;
    }

    let user_name = bot.names().get(&invocation.user_id).await?;
    let prompt_line = format_prompt_line(&user_name, &invocation.command, &invocation.text);

    info!(
        user_id = %invocation.user_id,
        channel_id = %invocation.channel_id,
        visibility = parsed.visibility.response_type(),
        "handling slash command"
    );

    let response = bot
        .completions()
        .complete(parsed.prompt, &CompletionOverrides::default())
        .await?;

    let repost_value = if should_offer_repost(parsed.visibility, invocation.is_direct_message()) {
        repost_button_value(&prompt_line, &response)?
    } else {
        None
    };

    let payload = create_command_reply_payload(
        &prompt_line,
        &response,
        parsed.visibility,
        repost_value.as_deref(),
    );

    bot.platform()
        .respond(&invocation.response_url, &payload)
        .await
}
