use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Static settings for an agent. Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier in the endpoint's naming scheme
    pub model: String,
    /// Base URL of the OpenAI-compatible completion API
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: i32,

    /// Task types the agent may execute
    pub allowed_operations: Vec<String>,
    /// Logical application names and the URL each one opens
    pub app_urls: BTreeMap<String, String>,

    /// Ask the attached confirmer before running a task
    pub require_confirmation: bool,
    /// Upper bound on task executions in a row. Unset means no limit.
    pub max_consecutive_requests: Option<usize>,

    pub request_timeout_secs: u64,
    /// Number of most recent turns replayed to the model. Unset replays the whole history.
    pub history_window: Option<usize>,
    /// Ask the endpoint for a bare JSON object and parse the reply strictly first
    pub strict_json: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let allowed_operations = [
            "browse",
            "search",
            "book",
            "file_read",
            "file_write",
            "system_cmd",
            "calendar",
            "email",
            "reminder",
            "weather",
            "maps",
            "calculate",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let app_urls = [
            ("google", "https://www.google.com"),
            ("maps", "https://www.google.com/maps"),
            ("calendar", "https://calendar.google.com"),
            ("email", "https://mail.google.com"),
            ("weather", "https://weather.com"),
            ("booking", "https://www.opentable.com"),
        ]
        .into_iter()
        .map(|(name, url)| (name.to_string(), url.to_string()))
        .collect();

        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            allowed_operations,
            app_urls,
            require_confirmation: true,
            max_consecutive_requests: None,
            request_timeout_secs: 60,
            history_window: None,
            strict_json: false,
        }
    }
}

impl AgentConfig {
    pub fn is_allowed(&self, task_type: &str) -> bool {
        self.allowed_operations.iter().any(|op| op == task_type)
    }

    pub fn app_url(&self, app: &str) -> Option<&str> {
        self.app_urls.get(app).map(String::as_str)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
