//! Builds the completion prompt for a direct-message conversation.
//!
//! Recent channel history becomes a transcript of `<Name | 3 minutes ago>: text`
//! lines, trimmed to a trailing character budget, followed by an open turn for
//! the bot. Each speaker's `<Name |` prefix doubles as a stop sequence so the
//! model does not write the next human turn itself.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::params::MAX_STOP_SEQUENCES;
use crate::core::NameCache;
use crate::core::models::HistoryEntry;
use crate::errors::BotError;
use crate::utils::{elapsed_seconds, readable_duration};

/// A bare message with this text clears everything before it.
pub const RESET_KEYWORD: &str = "reset";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPrompt {
    pub prompt: String,
    /// Bot marker first, then other speakers from most to least recent.
    pub stop: Vec<String>,
}

#[must_use]
pub fn speaker_marker(name: &str) -> String {
    format!("<{name} |")
}

#[must_use]
pub fn format_transcript_line(name: &str, age: &str, text: &str) -> String {
    format!("<{name} | {age} ago>: {text}")
}

/// Joins chronological lines with spaces and keeps the last `max_chars` characters.
#[must_use]
pub fn window_transcript(lines: &[String], max_chars: usize) -> String {
    let joined = lines.join(" ");
    let total = joined.chars().count();
    if total <= max_chars {
        joined
    } else {
        joined.chars().skip(total - max_chars).collect()
    }
}

#[must_use]
pub fn render_prompt(bot_name: &str, transcript: &str) -> String {
    format!(
        "This is a conversation with {bot_name}, a friendly, helpful AI bot.\n\n{transcript}\n<{bot_name} | now>:"
    )
}

/// Messages newer than the most recent `reset`, still newest first.
#[must_use]
pub fn messages_since_reset(history: &[HistoryEntry]) -> &[HistoryEntry] {
    let end = history
        .iter()
        .position(|m| m.text == RESET_KEYWORD)
        .unwrap_or(history.len());
    &history[..end]
}

/// Turns newest-first `history` into the prompt for the bot's next turn.
///
/// # Errors
///
/// Returns an error if a speaker's name lookup fails or a message carries an
/// unparsable timestamp.
pub async fn build_conversation_prompt(
    history: &[HistoryEntry],
    names: &NameCache,
    bot_user_id: &str,
    now: DateTime<Utc>,
    max_chars: usize,
) -> Result<ConversationPrompt, BotError> {
    let mut lines = Vec::new();
    let mut speakers: Vec<String> = Vec::new();

    for message in messages_since_reset(history) {
        let Some(user_id) = message.user_id.as_deref() else {
            debug!(ts = %message.ts, "skipping history message without a user");
            continue;
        };

        let name = names.get(user_id).await?;
        let age = readable_duration(elapsed_seconds(&message.ts, now)?);
        lines.push(format_transcript_line(&name, &age, &message.text));

        let marker = speaker_marker(&name);
        if !speakers.contains(&marker) {
            speakers.push(marker);
        }
    }
    lines.reverse();

    let bot_name = names.get(bot_user_id).await?;
    let bot_marker = speaker_marker(&bot_name);

    let mut stop = vec![bot_marker.clone()];
    stop.extend(
        speakers
            .into_iter()
            .filter(|m| *m != bot_marker)
            .take(MAX_STOP_SEQUENCES - 1),
    );

    let transcript = window_transcript(&lines, max_chars);

    Ok(ConversationPrompt {
        prompt: render_prompt(&bot_name, &transcript),
        stop,
    })
}
