use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

pub const UNKNOWN_TASK: &str = "unknown";
pub const ERROR_TASK: &str = "error";

/// Structured intent extracted from a free-text request by the model.
///
/// `error` is only set on the two sentinel tasks produced when extraction fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Task {
    pub fn new<S: Into<String>>(task_type: S, parameters: Map<String, Value>) -> Self {
        Self {
            task_type: task_type.into(),
            action: None,
            parameters,
            error: None,
        }
    }

    /// The reply carried no JSON object at all
    pub fn unknown() -> Self {
        Self {
            error: Some("No task information found".to_string()),
            ..Self::new(UNKNOWN_TASK, Map::new())
        }
    }

    /// The reply carried something that looked like JSON but did not parse
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new(ERROR_TASK, Map::new())
        }
    }

    /// Build a task from decoded JSON, tolerating missing or mistyped fields
    pub fn from_value(value: &Value) -> Self {
        let task_type = value
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let action = value
            .get("action")
            .and_then(|v| v.as_str())
            .map(String::from);
        let parameters = value
            .get("parameters")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        Self {
            action,
            ..Self::new(task_type, parameters)
        }
    }
}

/// The task types the dispatcher knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum TaskKind {
    Browse,
    Search,
    Book,
    Weather,
    Maps,
    SystemCmd,
}

impl TaskKind {
    /// Parameter names the model is asked to fill in for this kind
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            TaskKind::Browse => &["url"],
            TaskKind::Search => &["query"],
            TaskKind::Book => &["details"],
            TaskKind::Weather => &["location"],
            TaskKind::Maps => &["start", "end"],
            TaskKind::SystemCmd => &["command"],
        }
    }
}

/// A runnable task with its parameters resolved
#[derive(Debug, Clone, PartialEq)]
pub enum TaskRequest {
    Browse { url: String, app: String },
    Search { query: String },
    Book { details: Value },
    Weather { location: String },
    Maps { start: String, end: String },
    SystemCmd { command: String },
}

impl TaskRequest {
    /// Resolve a task type and its raw parameters. Missing parameters become empty strings;
    /// `None` means the type has no handler.
    pub fn parse(task_type: &str, parameters: &Map<String, Value>) -> Option<Self> {
        let kind = TaskKind::from_str(task_type).ok()?;
        let request = match kind {
            TaskKind::Browse => TaskRequest::Browse {
                url: string_param(parameters, "url"),
                app: string_param(parameters, "app"),
            },
            TaskKind::Search => TaskRequest::Search {
                query: string_param(parameters, "query"),
            },
            TaskKind::Book => TaskRequest::Book {
                details: parameters
                    .get("details")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new())),
            },
            TaskKind::Weather => TaskRequest::Weather {
                location: string_param(parameters, "location"),
            },
            TaskKind::Maps => TaskRequest::Maps {
                start: string_param(parameters, "start"),
                end: string_param(parameters, "end"),
            },
            TaskKind::SystemCmd => TaskRequest::SystemCmd {
                command: string_param(parameters, "command"),
            },
        };
        Some(request)
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            TaskRequest::Browse { .. } => TaskKind::Browse,
            TaskRequest::Search { .. } => TaskKind::Search,
            TaskRequest::Book { .. } => TaskKind::Book,
            TaskRequest::Weather { .. } => TaskKind::Weather,
            TaskRequest::Maps { .. } => TaskKind::Maps,
            TaskRequest::SystemCmd { .. } => TaskKind::SystemCmd,
        }
    }
}

fn string_param(parameters: &Map<String, Value>, key: &str) -> String {
    match parameters.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
