//! Handler for Slack interactive components.
//!
//! The only interaction is the "Post publicly" button on a private `/ai`
//! answer: the preview is re-posted in the channel and the private copy is
//! deleted.

use tracing::{debug, info};

use crate::core::models::{RepostAction, RepostPayload};
use crate::errors::BotError;
use crate::slack::SlackBot;
use crate::slack::response_builder::{
    REPOST_ACTION_ID, create_delete_original_payload, create_public_repost_message,
};

/// Whether a clicked action is ours to handle.
#[must_use]
pub fn is_repost_action(action_id: &str) -> bool {
    action_id == REPOST_ACTION_ID
}

/// Publish a previewed answer, then remove the preview.
///
/// # Errors
///
/// Returns `BotError::ParseError` for a malformed button value (nothing is
/// posted), or an upstream error if posting or deleting fails.
pub async fn handle_public_repost(bot: &SlackBot, action: &RepostAction) -> Result<(), BotError> {
    let payload = RepostPayload::from_button_value(&action.value)?;

    info!(
        user_id = %action.user_id,
        channel_id = %action.channel_id,
        "reposting answer publicly"
    );

    bot.platform()
        .post_message(
            &action.channel_id,
            &create_public_repost_message(&payload.prompt, &payload.response),
        )
        .await?;

    bot.platform()
        .respond(&action.response_url, &create_delete_original_payload())
        .await?;

    debug!(channel_id = %action.channel_id, "deleted private preview");
    Ok(())
}
