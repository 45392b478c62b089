use anyhow::Result;
use std::sync::Arc;
#[cfg(test)]
use mockall::automock;

use crate::classifier::{Classification, TaskClassifier};
use crate::config::AgentConfig;
use crate::dispatcher::TaskDispatcher;
use crate::models::history::ConversationHistory;
use crate::models::message::Message;
use crate::models::task::Task;
use crate::opener::UrlOpener;
use crate::providers::base::Provider;

pub const COMPLETED_PREFIX: &str = "I've completed the task: ";

/// Asked before an allow-listed task runs when `require_confirmation` is set
#[cfg_attr(test, automock)]
pub trait Confirmer: Send + Sync {
    fn confirm(&self, task: &Task) -> bool;
}

/// Agent pairs a completion model with the task handlers and keeps the conversation
pub struct Agent {
    config: Arc<AgentConfig>,
    classifier: TaskClassifier,
    dispatcher: TaskDispatcher,
    history: ConversationHistory,
    confirmer: Option<Box<dyn Confirmer>>,
    consecutive_tasks: usize,
}

impl Agent {
    pub fn new(
        config: Arc<AgentConfig>,
        provider: Arc<dyn Provider>,
        opener: Arc<dyn UrlOpener>,
    ) -> Result<Self> {
        Ok(Self {
            classifier: TaskClassifier::new(provider, config.clone())?,
            dispatcher: TaskDispatcher::new(config.clone(), opener),
            config,
            history: ConversationHistory::new(),
            confirmer: None,
            consecutive_tasks: 0,
        })
    }

    pub fn with_confirmer(mut self, confirmer: Box<dyn Confirmer>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Handle one user request and return the reply shown to the user.
    ///
    /// Failures are reported in the reply rather than returned. Turns appended before the
    /// failure stay in the history.
    pub async fn process_command(&mut self, text: &str) -> String {
        match self.respond(text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "failed to process command");
                format!("An error occurred: {}", e)
            }
        }
    }

    /// Run a task directly, bypassing the model
    pub fn execute_task(&self, task: &Task) -> String {
        if !self.config.is_allowed(&task.task_type) {
            return format!("Operation {} is not allowed", task.task_type);
        }
        self.dispatcher.dispatch(&task.task_type, &task.parameters)
    }

    async fn respond(&mut self, text: &str) -> Result<String> {
        self.history.push(Message::user(text));

        let Classification { reply, task } = self.classifier.classify(&self.history, text).await?;

        let response = if self.config.is_allowed(&task.task_type) {
            self.act(&task)
        } else {
            // plain conversation, or a task type this agent may not run
            self.consecutive_tasks = 0;
            reply
        };

        self.history.push(Message::assistant(response.clone()));
        Ok(response)
    }

    fn act(&mut self, task: &Task) -> String {
        if let Some(limit) = self.config.max_consecutive_requests {
            if self.consecutive_tasks >= limit {
                tracing::warn!(task_type = %task.task_type, limit, "consecutive task limit reached");
                self.consecutive_tasks = 0;
                return format!(
                    "Skipped {}: reached the limit of {} consecutive task requests",
                    task.task_type, limit
                );
            }
        }

        if self.config.require_confirmation {
            if let Some(confirmer) = &self.confirmer {
                if !confirmer.confirm(task) {
                    tracing::info!(task_type = %task.task_type, "task declined");
                    return format!("Cancelled the {} task", task.task_type);
                }
            }
        }

        self.consecutive_tasks += 1;
        let result = self.dispatcher.dispatch(&task.task_type, &task.parameters);
        tracing::info!(task_type = %task.task_type, "task executed");
        format!("{}{}", COMPLETED_PREFIX, result)
    }
}
