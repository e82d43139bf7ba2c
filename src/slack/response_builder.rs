//! Response-related utilities for Slack interactions.
//!
//! This module provides standardized ways to create and format
//! responses sent to Slack.

use serde_json::{Value, json};

use crate::core::models::Visibility;

/// Action id of the "Post publicly" button.
pub const REPOST_ACTION_ID: &str = "public_repost";

/// Side-bar colour of the attachment holding a model response.
pub const ATTACHMENT_COLOR: &str = "#3AA3E3";

/// Slack rejects button values longer than this.
pub const MAX_BUTTON_VALUE_LEN: usize = 2000;

const EMPTY_RESPONSE_TEXT: &str = "_(empty response)_";

/// Create a JSON payload for an ephemeral response
///
/// # Examples
///
/// ```
/// use aibot::slack::response_builder::create_ephemeral_payload;
///
/// let payload = create_ephemeral_payload("This message is only visible to you");
/// assert_eq!(payload["response_type"], "ephemeral");
/// ```
#[must_use]
pub fn create_ephemeral_payload(text: &str) -> Value {
    json!({
        "text": text,
        "response_type": "ephemeral"
    })
}

/// Attachment carrying a model response, with an optional repost button.
#[must_use]
pub fn create_response_attachment(response: &str, repost_value: Option<&str>) -> Value {
    let section_text = if response.trim().is_empty() {
        EMPTY_RESPONSE_TEXT
    } else {
        response
    };

    let mut blocks = vec![json!({
        "type": "section",
        "text": {"type": "mrkdwn", "text": section_text}
    })];

    if let Some(value) = repost_value {
        blocks.push(json!({
            "type": "actions",
            "elements": [{
                "type": "button",
                "action_id": REPOST_ACTION_ID,
                "text": {"type": "plain_text", "text": "Post publicly"},
                "value": value
            }]
        }));
    }

    json!({
        "color": ATTACHMENT_COLOR,
        "fallback": response,
        "blocks": blocks
    })
}

/// Reply to a slash command, sent through its `response_url`.
#[must_use]
pub fn create_command_reply_payload(
    prompt_line: &str,
    response: &str,
    visibility: Visibility,
    repost_value: Option<&str>,
) -> Value {
    json!({
        "response_type": visibility.response_type(),
        "text": prompt_line,
        "attachments": [create_response_attachment(response, repost_value)]
    })
}

/// Public copy of a previewed response, posted with `chat.postMessage`.
#[must_use]
pub fn create_public_repost_message(prompt_line: &str, response: &str) -> Value {
    json!({
        "text": prompt_line,
        "attachments": [create_response_attachment(response, None)]
    })
}

/// Removes the message a `response_url` belongs to.
#[must_use]
pub fn create_delete_original_payload() -> Value {
    json!({
        "text": "",
        "replace_original": true,
        "delete_original": true
    })
}

/// Plain text message, posted with `chat.postMessage`.
#[must_use]
pub fn create_text_message(text: &str) -> Value {
    json!({ "text": text })
}
