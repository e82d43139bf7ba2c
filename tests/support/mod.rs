//! In-memory stand-ins for Slack and `OpenAI` shared by the handler tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use aibot::BotError;
use aibot::ai::{CompletionApi, CompletionOverrides};
use aibot::core::models::HistoryEntry;
use aibot::slack::{BotSettings, ChatPlatform, SlackBot, UserDirectory};
use async_trait::async_trait;
use serde_json::Value;

pub const BOT_USER_ID: &str = "UBOT";

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    Post { channel_id: String, message: Value },
    Respond { response_url: String, payload: Value },
}

#[derive(Default)]
pub struct FakePlatform {
    pub names: HashMap<String, String>,
    pub history: Vec<HistoryEntry>,
    pub calls: Mutex<Vec<PlatformCall>>,
    pub lookups: Mutex<Vec<String>>,
    pub history_limits: Mutex<Vec<u16>>,
}

impl FakePlatform {
    pub fn with_names(pairs: &[(&str, &str)]) -> Self {
        Self {
            names: pairs
                .iter()
                .map(|(id, name)| ((*id).to_string(), (*name).to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for FakePlatform {
    async fn user_display_name(&self, user_id: &str) -> Result<String, BotError> {
        self.lookups.lock().unwrap().push(user_id.to_string());
        self.names
            .get(user_id)
            .cloned()
            .ok_or_else(|| BotError::ApiError(format!("users.info error: user_not_found ({user_id})")))
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn channel_history(
        &self,
        _channel_id: &str,
        limit: u16,
    ) -> Result<Vec<HistoryEntry>, BotError> {
        self.history_limits.lock().unwrap().push(limit);
        Ok(self.history.clone())
    }

    async fn post_message(&self, channel_id: &str, message: &Value) -> Result<(), BotError> {
        self.calls.lock().unwrap().push(PlatformCall::Post {
            channel_id: channel_id.to_string(),
            message: message.clone(),
        });
        Ok(())
    }

    async fn respond(&self, response_url: &str, payload: &Value) -> Result<(), BotError> {
        self.calls.lock().unwrap().push(PlatformCall::Respond {
            response_url: response_url.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

pub struct FakeCompletions {
    pub reply: Result<String, String>,
    pub requests: Mutex<Vec<(String, CompletionOverrides)>>,
}

impl FakeCompletions {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, CompletionOverrides)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionApi for FakeCompletions {
    async fn complete(
        &self,
        prompt: &str,
        overrides: &CompletionOverrides,
    ) -> Result<String, BotError> {
        self.requests
            .lock()
            .unwrap()
            .push((prompt.to_string(), overrides.clone()));
        self.reply.clone().map_err(BotError::OpenAIError)
    }
}

pub fn settings() -> BotSettings {
    BotSettings {
        bot_user_id: BOT_USER_ID.to_string(),
        command: "/ai".to_string(),
        max_prompt_chars: 1000,
        history_limit: 100,
    }
}

pub fn bot(platform: Arc<FakePlatform>, completions: Arc<FakeCompletions>) -> SlackBot {
    SlackBot::with_services(platform, completions, settings())
}
