use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::models::message::Message;
use crate::providers::base::{Provider, Usage};

/// A mock provider that returns pre-configured replies and records what it was sent
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<(String, Vec<Message>)>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of successful replies
    pub fn new<S: ToString>(replies: &[S]) -> Self {
        Self::scripted(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    /// Create a mock provider from replies and transport failures
    pub fn scripted(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The (system prompt, messages) pairs received so far
    pub fn requests(&self) -> Vec<(String, Vec<Message>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, system: &str, messages: &[Message]) -> Result<(Message, Usage)> {
        self.requests
            .lock()
            .unwrap()
            .push((system.to_string(), messages.to_vec()));

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok((Message::assistant(text), Usage::default())),
            Some(Err(e)) => Err(anyhow!(e)),
            // Return empty reply if no more pre-configured replies
            None => Ok((Message::assistant(""), Usage::default())),
        }
    }
}
