//! Sampling parameters for the completions endpoint.

use openai_api_rs::v1::completion::CompletionRequest;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";

/// The completions endpoint rejects requests with more stop sequences than this.
pub const MAX_STOP_SEQUENCES: usize = 4;

/// Fixed request parameters, loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: i32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stop: Option<Vec<String>>,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 250,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stop: None,
        }
    }
}

/// Per-call overrides. Unset fields keep the configured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOverrides {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
    pub stop: Option<Vec<String>>,
}

impl CompletionOverrides {
    #[must_use]
    pub fn with_stop(stop: Vec<String>) -> Self {
        Self {
            stop: Some(stop),
            ..Default::default()
        }
    }
}

impl CompletionParams {
    #[must_use]
    pub fn merged(&self, overrides: &CompletionOverrides) -> CompletionParams {
        CompletionParams {
            model: overrides.model.clone().unwrap_or_else(|| self.model.clone()),
            temperature: overrides.temperature.unwrap_or(self.temperature),
            max_tokens: overrides.max_tokens.unwrap_or(self.max_tokens),
            top_p: overrides.top_p.unwrap_or(self.top_p),
            frequency_penalty: overrides
                .frequency_penalty
                .unwrap_or(self.frequency_penalty),
            presence_penalty: overrides.presence_penalty.unwrap_or(self.presence_penalty),
            stop: overrides.stop.clone().or_else(|| self.stop.clone()),
        }
    }

    /// Builds the wire request for `prompt`. Empty stop lists are left out.
    #[must_use]
    pub fn to_request(&self, prompt: &str) -> CompletionRequest {
        let request = CompletionRequest::new(self.model.clone(), prompt.to_string())
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .top_p(self.top_p)
            .frequency_penalty(self.frequency_penalty)
            .presence_penalty(self.presence_penalty);

        match &self.stop {
            Some(stop) if !stop.is_empty() => {
                let capped: Vec<String> = stop.iter().take(MAX_STOP_SEQUENCES).cloned().collect();
                request.stop(capped)
            }
            _ => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_field_by_field() {
        let base = CompletionParams::default();
        let overrides = CompletionOverrides {
            temperature: Some(0.1),
            stop: Some(vec!["<Ada |".to_string()]),
            ..Default::default()
        };

        let merged = base.merged(&overrides);

        assert!((merged.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(merged.stop, Some(vec!["<Ada |".to_string()]));
        assert_eq!(merged.model, DEFAULT_MODEL);
        assert_eq!(merged.max_tokens, 250);
    }

    #[test]
    fn empty_overrides_keep_configuration() {
        let base = CompletionParams {
            model: "custom".to_string(),
            ..Default::default()
        };
        assert_eq!(base.merged(&CompletionOverrides::default()), base);
    }

    #[test]
    fn request_caps_stop_sequences() {
        let stop: Vec<String> = (0..6).map(|i| format!("<U{i} |")).collect();
        let params = CompletionParams::default().merged(&CompletionOverrides::with_stop(stop));

        let body = serde_json::to_value(params.to_request("hi")).unwrap();

        assert_eq!(body["prompt"], "hi");
        assert_eq!(body["max_tokens"], 250);
        assert_eq!(body["stop"].as_array().map(Vec::len), Some(MAX_STOP_SEQUENCES));
        assert_eq!(body["stop"][0], "<U0 |");
    }
}
