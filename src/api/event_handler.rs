//! Handler for direct messages to the bot.
//!
//! Each DM is answered in the same channel using the recent conversation as
//! context, see [`crate::ai::prompt_builder`].

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::ai::CompletionOverrides;
use crate::ai::prompt_builder::build_conversation_prompt;
use crate::core::models::DirectMessage;
use crate::errors::BotError;
use crate::slack::SlackBot;
use crate::slack::response_builder::create_text_message;

/// Whether `message` is a plain DM from a person other than the bot.
#[must_use]
pub fn should_answer(message: &DirectMessage, bot_user_id: &str) -> bool {
    if !message.channel_id.starts_with('D') || message.has_subtype || message.bot_id.is_some() {
        return false;
    }
    match message.user_id.as_deref() {
        Some(user_id) => user_id != bot_user_id,
        None => false,
    }
}

/// Reply to a direct message, using the clock for message ages.
///
/// # Errors
///
/// Returns an error if fetching history, resolving names, the completion
/// request, or posting the reply fails.
pub async fn handle_direct_message(bot: &SlackBot, message: &DirectMessage) -> Result<(), BotError> {
    handle_direct_message_at(bot, message, Utc::now()).await
}

/// Reply to a direct message as if the current time were `now`.
///
/// # Errors
///
/// See [`handle_direct_message`].
pub async fn handle_direct_message_at(
    bot: &SlackBot,
    message: &DirectMessage,
    now: DateTime<Utc>,
) -> Result<(), BotError> {
    if !should_answer(message, bot.bot_user_id()) {
        debug!(channel_id = %message.channel_id, "ignoring message event");
        return Ok(());
    }

    let settings = bot.settings();
    let history = bot
        .platform()
        .channel_history(&message.channel_id, settings.history_limit)
        .await?;

    let conversation = build_conversation_prompt(
        &history,
        bot.names(),
        bot.bot_user_id(),
        now,
        settings.max_prompt_chars,
    )
    .await?;

    info!(
        channel_id = %message.channel_id,
        history_len = history.len(),
        stop_count = conversation.stop.len(),
        "answering direct message"
    );
    debug!("Conversation prompt:\n{}", conversation.prompt);

    let response = bot
        .completions()
        .complete(
            &conversation.prompt,
            &CompletionOverrides::with_stop(conversation.stop),
        )
        .await?;

    bot.platform()
        .post_message(&message.channel_id, &create_text_message(&response))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dm(user: Option<&str>) -> DirectMessage {
        DirectMessage {
            channel_id: "D123".to_string(),
            user_id: user.map(ToString::to_string),
            text: "hi".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn answers_people_in_dms() {
        assert!(should_answer(&dm(Some("U1")), "UBOT"));
    }

    #[test]
    fn ignores_own_and_anonymous_messages() {
        assert!(!should_answer(&dm(Some("UBOT")), "UBOT"));
        assert!(!should_answer(&dm(None), "UBOT"));
    }

    #[test]
    fn ignores_channels_edits_and_bots() {
        let mut in_channel = dm(Some("U1"));
        in_channel.channel_id = "C123".to_string();
        assert!(!should_answer(&in_channel, "UBOT"));

        let mut edited = dm(Some("U1"));
        edited.has_subtype = true;
        assert!(!should_answer(&edited, "UBOT"));

        let mut from_bot = dm(Some("U1"));
        from_bot.bot_id = Some("B1".to_string());
        assert!(!should_answer(&from_bot, "UBOT"));
    }
}
