use std::time::Duration;

use crate::config::AgentConfig;

pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_APP_TITLE: &str = "Concierge";

/// Connection settings for an OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    /// Base URL including the API version, e.g. `https://openrouter.ai/api/v1`
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
    pub timeout: Duration,
    /// Request `response_format: json_object`
    pub json_response: bool,
    /// Sent as `X-Title`, which OpenRouter uses to attribute requests
    pub app_title: String,
    /// Sent as `HTTP-Referer` when set
    pub referer: Option<String>,
}

impl OpenAiProviderConfig {
    pub fn from_agent_config(config: &AgentConfig, api_key: String) -> Self {
        Self {
            host: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
            timeout: config.request_timeout(),
            json_response: config.strict_json,
            app_title: DEFAULT_APP_TITLE.to_string(),
            referer: None,
        }
    }
}
