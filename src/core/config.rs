use std::env;
use std::str::FromStr;

use crate::ai::CompletionParams;
use crate::errors::BotError;

pub const DEFAULT_COMMAND: &str = "/ai";
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 1000;
pub const DEFAULT_HISTORY_LIMIT: u16 = 100;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub slack_app_token: String,
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub command: String,
    /// Trailing character budget for the conversation transcript.
    pub max_prompt_chars: usize,
    pub history_limit: u16,
    pub completion: CompletionParams,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` when a required variable is missing or a
    /// numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, BotError> {
        let mut completion = CompletionParams::default();
        if let Ok(model) = env::var("OPENAI_MODEL") {
            completion.model = model;
        }

        Ok(Self {
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            slack_app_token: required("SLACK_APP_TOKEN")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_org_id: env::var("OPENAI_ORG_ID").ok(),
            command: env::var("AI_COMMAND").unwrap_or_else(|_| DEFAULT_COMMAND.to_string()),
            max_prompt_chars: parsed_or("MAX_PROMPT_CHARS", DEFAULT_MAX_PROMPT_CHARS)?,
            history_limit: parsed_or("HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?,
            completion,
        })
    }
}

fn required(name: &str) -> Result<String, BotError> {
    env::var(name).map_err(|e| BotError::ConfigError(format!("{}: {}", name, e)))
}

fn parsed_or<T>(name: &str, default: T) -> Result<T, BotError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| BotError::ConfigError(format!("{}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
