use std::sync::Arc;

use super::client::SlackClient;
use super::{ChatPlatform, UserDirectory};
use crate::ai::{CompletionApi, LlmClient};
use crate::core::NameCache;
use crate::core::config::AppConfig;
use crate::errors::BotError;

/// Per-process knobs the handlers read.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub bot_user_id: String,
    pub command: String,
    pub max_prompt_chars: usize,
    pub history_limit: u16,
}

/// Everything a handler needs: the chat platform, the completion API, and the
/// shared name cache.
pub struct SlackBot {
    platform: Arc<dyn ChatPlatform>,
    completions: Arc<dyn CompletionApi>,
    names: NameCache,
    settings: BotSettings,
}

impl SlackBot {
    /// Connects to Slack and `OpenAI` using `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bot's own user id cannot be resolved with
    /// `auth.test` or the `OpenAI` HTTP client cannot be built.
    pub async fn new(config: &AppConfig) -> Result<Self, BotError> {
        let slack_client = Arc::new(SlackClient::new(config.slack_bot_token.clone()));
        let bot_user_id = slack_client.get_bot_user_id().await?;
        let llm_client = LlmClient::new(
            config.openai_api_key.clone(),
            config.openai_org_id.clone(),
            config.completion.clone(),
        )?;

        let settings = BotSettings {
            bot_user_id,
            command: config.command.clone(),
            max_prompt_chars: config.max_prompt_chars,
            history_limit: config.history_limit,
        };

        Ok(Self::with_services(
            slack_client,
            Arc::new(llm_client),
            settings,
        ))
    }

    /// Assemble a bot from already-built services.
    pub fn with_services<P>(
        platform: Arc<P>,
        completions: Arc<dyn CompletionApi>,
        settings: BotSettings,
    ) -> Self
    where
        P: ChatPlatform + 'static,
    {
        let directory: Arc<dyn UserDirectory> = platform.clone();
        Self {
            platform,
            completions,
            names: NameCache::new(directory),
            settings,
        }
    }

    #[must_use]
    pub fn platform(&self) -> &dyn ChatPlatform {
        self.platform.as_ref()
    }

    #[must_use]
    pub fn completions(&self) -> &dyn CompletionApi {
        self.completions.as_ref()
    }

    #[must_use]
    pub fn names(&self) -> &NameCache {
        &self.names
    }

    #[must_use]
    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    #[must_use]
    pub fn bot_user_id(&self) -> &str {
        &self.settings.bot_user_id
    }
}
