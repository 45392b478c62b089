use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::base::{Provider, Usage};
use super::configs::OpenAiProviderConfig;
use super::utils::{
    check_openai_context_length_error, messages_to_openai_format, openai_response_to_message,
};
use crate::errors::ConciergeError;
use crate::models::message::Message;

/// Client for OpenAI-compatible chat completion APIs (OpenRouter, OpenAI, local gateways)
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    fn get_usage(data: &Value) -> Usage {
        let Some(usage) = data.get("usage") else {
            return Usage::default();
        };

        let input_tokens = usage
            .get("prompt_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let output_tokens = usage
            .get("completion_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let total_tokens = usage
            .get("total_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32)
            .or_else(|| match (input_tokens, output_tokens) {
                (Some(input), Some(output)) => Some(input + output),
                _ => None,
            });

        Usage::new(input_tokens, output_tokens, total_tokens)
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let url = format!(
            "{}/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let mut request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("X-Title", &self.config.app_title);
        if let Some(referer) = &self.config.referer {
            request = request.header("HTTP-Referer", referer);
        }

        let response = request.json(&payload).send().await.map_err(|e| {
            if e.is_timeout() {
                ConciergeError::Timeout(self.config.timeout.as_secs())
            } else {
                ConciergeError::RequestFailed(e.to_string())
            }
        })?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(ConciergeError::Unauthorized(status.to_string()).into())
            }
            status if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() => {
                Err(ConciergeError::ServerError(status.to_string()).into())
            }
            status => Err(ConciergeError::RequestFailed(status.to_string()).into()),
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, system: &str, messages: &[Message]) -> Result<(Message, Usage)> {
        let system_message = json!({
            "role": "system",
            "content": system
        });

        // create messages array with system message first
        let mut messages_array = vec![system_message];
        messages_array.extend(messages_to_openai_format(messages));

        let mut payload = json!({
            "model": self.config.model,
            "messages": messages_array
        });

        if let Some(object) = payload.as_object_mut() {
            if let Some(temp) = self.config.temperature {
                object.insert("temperature".to_string(), json!(temp));
            }
            if let Some(tokens) = self.config.max_tokens {
                object.insert("max_tokens".to_string(), json!(tokens));
            }
            if self.config.json_response {
                object.insert(
                    "response_format".to_string(),
                    json!({"type": "json_object"}),
                );
            }
        }

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            "requesting completion"
        );
        let response = self.post(payload).await?;

        // Raise specific error if context length is exceeded
        if let Some(error) = response.get("error") {
            if let Some(err) = check_openai_context_length_error(error) {
                return Err(err.into());
            }
            return Err(ConciergeError::Api(error.to_string()).into());
        }

        let message = openai_response_to_message(&response)?;
        let usage = Self::get_usage(&response);
        tracing::debug!(total_tokens = ?usage.total_tokens, "completion received");

        Ok((message, usage))
    }
}
