use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::config::AgentConfig;
use crate::errors::ConciergeError;
use crate::models::history::ConversationHistory;
use crate::models::message::Message;
use crate::models::task::{Task, TaskKind};
use crate::prompt_template::load_prompt_file;
use crate::providers::base::Provider;

#[derive(Serialize)]
struct TaskInfo {
    name: &'static str,
    parameters: &'static [&'static str],
}

#[derive(Serialize)]
struct PromptContext {
    tasks: Vec<TaskInfo>,
    strict_json: bool,
}

/// The model's raw reply together with the task extracted from it
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub reply: String,
    pub task: Task,
}

/// Asks the model to turn a request into a [`Task`]
pub struct TaskClassifier {
    provider: Arc<dyn Provider>,
    config: Arc<AgentConfig>,
    system_prompt: String,
}

impl TaskClassifier {
    pub fn new(provider: Arc<dyn Provider>, config: Arc<AgentConfig>) -> Result<Self> {
        let context = PromptContext {
            tasks: TaskKind::iter()
                .map(|kind| TaskInfo {
                    name: kind.into(),
                    parameters: kind.parameters(),
                })
                .collect(),
            strict_json: config.strict_json,
        };
        let system_prompt = load_prompt_file("classifier.md", &context)
            .map_err(|e| ConciergeError::Prompt(e.to_string()))?;

        Ok(Self {
            provider,
            config,
            system_prompt,
        })
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Classify `new_message` in the context of `history`.
    ///
    /// Malformed replies never fail; they come back as the `unknown` or `error` task.
    /// Transport failures are returned as errors.
    pub async fn classify(
        &self,
        history: &ConversationHistory,
        new_message: &str,
    ) -> Result<Classification> {
        let mut messages = history.window(self.config.history_window).to_vec();
        messages.push(Message::user(format!(
            "Parse this request and return a JSON response: {}",
            new_message
        )));

        let (response, _usage) = self
            .provider
            .complete(&self.system_prompt, &messages)
            .await?;

        let reply = response.content;
        let task = parse_task(&reply, self.config.strict_json);
        tracing::debug!(task_type = %task.task_type, "classified request");

        Ok(Classification { reply, task })
    }
}

/// Extract a task from a model reply.
///
/// With `strict` the whole reply is tried as a JSON object first. The brace scan that
/// follows is best-effort: it assumes a single object and no braces in surrounding prose.
pub fn parse_task(reply: &str, strict: bool) -> Task {
    if strict {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(reply.trim()) {
            return Task::from_value(&value);
        }
        tracing::debug!("reply is not a bare JSON object, scanning for braces");
    }

    let Some(start) = reply.find('{') else {
        return Task::unknown();
    };
    let candidate = match reply.rfind('}') {
        Some(end) if end > start => &reply[start..=end],
        _ => "",
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => Task::from_value(&value),
        Err(e) => Task::error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Role;
    use crate::models::task::{ERROR_TASK, UNKNOWN_TASK};
    use crate::providers::mock::MockProvider;
    use serde_json::json;

    #[test]
    fn test_parse_task_with_prose() {
        let reply = r#"Sure! Here is the task:
{"type": "search", "action": "web_search", "parameters": {"query": "sushi near me"}}
Let me know if you need anything else."#;

        let task = parse_task(reply, false);
        assert_eq!(task.task_type, "search");
        assert_eq!(task.action.as_deref(), Some("web_search"));
        assert_eq!(task.parameters["query"], json!("sushi near me"));
        assert!(task.error.is_none());
    }

    #[test]
    fn test_parse_task_without_braces_is_unknown() {
        let task = parse_task("I can't help with that.", false);
        assert_eq!(task.task_type, UNKNOWN_TASK);
        assert_eq!(task.error.as_deref(), Some("No task information found"));
    }

    #[test]
    fn test_parse_task_malformed_json_is_error() {
        let task = parse_task(r#"{"type": "search", "parameters": {"query": }"#, false);
        assert_eq!(task.task_type, ERROR_TASK);
        assert!(task.error.is_some());
        assert!(!task.error.unwrap().is_empty());
    }

    #[test]
    fn test_parse_task_open_brace_only_is_error() {
        let task = parse_task("here you go { nothing closes", false);
        assert_eq!(task.task_type, ERROR_TASK);

        let task = parse_task("} backwards {", false);
        assert_eq!(task.task_type, ERROR_TASK);
    }

    #[test]
    fn test_parse_task_two_objects_is_error() {
        // the span from the first '{' to the last '}' covers both objects
        let task = parse_task(r#"{"type": "search"} or {"type": "browse"}"#, false);
        assert_eq!(task.task_type, ERROR_TASK);
    }

    #[test]
    fn test_parse_task_strict_json() {
        let reply = r#"  {"type": "weather", "parameters": {"location": "London"}}  "#;
        let task = parse_task(reply, true);
        assert_eq!(task.task_type, "weather");
        assert_eq!(task.parameters["location"], json!("London"));

        // strict mode still falls back to scanning
        let task = parse_task(r#"Result: {"type": "maps"}"#, true);
        assert_eq!(task.task_type, "maps");
    }

    #[test]
    fn test_system_prompt_lists_task_types() -> Result<()> {
        let provider = Arc::new(MockProvider::new::<&str>(&[]));
        let classifier = TaskClassifier::new(provider, Arc::new(AgentConfig::default()))?;

        let prompt = classifier.system_prompt();
        assert!(prompt.contains(
            "Available task types: browse, search, book, weather, maps, system_cmd"
        ));
        assert!(prompt.contains("- maps: start, end"));
        assert!(prompt.contains("\"parameters\""));
        assert!(!prompt.contains("JSON object only"));
        Ok(())
    }

    #[tokio::test]
    async fn test_classify_sends_history_and_request() -> Result<()> {
        let provider = Arc::new(MockProvider::new(&[
            r#"{"type": "browse", "parameters": {"url": "https://google.com"}}"#,
        ]));
        let classifier =
            TaskClassifier::new(provider.clone(), Arc::new(AgentConfig::default()))?;

        let mut history = ConversationHistory::new();
        history.push(Message::user("open google"));

        let classification = classifier.classify(&history, "open google").await?;
        assert_eq!(classification.task.task_type, "browse");
        assert!(classification.reply.starts_with('{'));

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let (system, messages) = &requests[0];
        assert_eq!(system, classifier.system_prompt());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text(), "open google");
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(
            messages[1].text(),
            "Parse this request and return a JSON response: open google"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_classify_applies_history_window() -> Result<()> {
        let provider = Arc::new(MockProvider::new(&["no task here"]));
        let config = AgentConfig {
            history_window: Some(1),
            ..AgentConfig::default()
        };
        let classifier = TaskClassifier::new(provider.clone(), Arc::new(config))?;

        let mut history = ConversationHistory::new();
        history.push(Message::user("first"));
        history.push(Message::assistant("reply"));
        history.push(Message::user("second"));

        let classification = classifier.classify(&history, "second").await?;
        assert_eq!(classification.task.task_type, UNKNOWN_TASK);
        assert_eq!(classification.reply, "no task here");

        let (_, messages) = &provider.requests()[0];
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text(), "second");
        Ok(())
    }

    #[tokio::test]
    async fn test_classify_propagates_transport_failure() {
        let provider = Arc::new(MockProvider::scripted(vec![Err(
            "connection refused".to_string()
        )]));
        let classifier =
            TaskClassifier::new(provider, Arc::new(AgentConfig::default())).unwrap();

        let err = classifier
            .classify(&ConversationHistory::new(), "hello")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }
}
