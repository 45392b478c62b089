use anyhow::Result;
use serde_json::{json, Value};

use crate::errors::ConciergeError;
use crate::models::message::Message;

/// Convert internal messages to the chat completion message list
pub fn messages_to_openai_format(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            json!({
                "role": message.role,
                "content": message.content,
            })
        })
        .collect()
}

/// Read the first choice of a chat completion response as an assistant message
pub fn openai_response_to_message(response: &Value) -> Result<Message> {
    let text = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(ConciergeError::EmptyResponse)?;
    Ok(Message::assistant(text))
}

pub fn check_openai_context_length_error(error: &Value) -> Option<ConciergeError> {
    let code = error.get("code")?.as_str()?;
    if code == "context_length_exceeded" || code == "string_above_max_length" {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Some(ConciergeError::ContextLengthExceeded(message))
    } else {
        None
    }
}
