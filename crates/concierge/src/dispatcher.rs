use chrono::Local;
use serde_json::{Map, Value};
use std::sync::Arc;
use strum_macros::{AsRefStr, EnumIter, EnumString};
use sysinfo::System;
use urlencoding::encode;

use crate::config::AgentConfig;
use crate::models::task::TaskRequest;
use crate::opener::UrlOpener;

pub const SEARCH_URL: &str = "https://www.google.com/search?q=";

/// The only system queries a task may run. Anything else is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SafeCommand {
    Time,
    Date,
    Os,
}

impl SafeCommand {
    pub fn run(self) -> String {
        match self {
            SafeCommand::Time => format!("Current time is {}", Local::now().format("%H:%M:%S")),
            SafeCommand::Date => format!("Today's date is {}", Local::now().format("%Y-%m-%d")),
            SafeCommand::Os => format!(
                "Operating System: {} {}",
                System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
                System::kernel_version().unwrap_or_default()
            ),
        }
    }
}

/// Percent-encode free text for a URL. `/` is left alone so it still separates path segments.
pub fn encode_component(text: &str) -> String {
    encode(text).replace("%2F", "/")
}

pub fn run_safe_command(command: &str) -> String {
    match command.parse::<SafeCommand>() {
        Ok(safe) => safe.run(),
        Err(_) => {
            tracing::warn!(command, "refused system command");
            format!("Command '{}' not allowed for security reasons", command)
        }
    }
}

/// Routes tasks to their handlers. Handlers report failures as text and never return errors.
pub struct TaskDispatcher {
    config: Arc<AgentConfig>,
    opener: Arc<dyn UrlOpener>,
}

impl TaskDispatcher {
    pub fn new(config: Arc<AgentConfig>, opener: Arc<dyn UrlOpener>) -> Self {
        Self { config, opener }
    }

    pub fn dispatch(&self, task_type: &str, parameters: &Map<String, Value>) -> String {
        match TaskRequest::parse(task_type, parameters) {
            Some(request) => self.execute(&request),
            None => {
                tracing::warn!(task_type, "no handler for task type");
                format!("Unknown task type: {}", task_type)
            }
        }
    }

    pub fn execute(&self, request: &TaskRequest) -> String {
        let kind: &str = request.kind().into();
        tracing::debug!(kind, "running task");
        match request {
            TaskRequest::Browse { url, app } if url.is_empty() && !app.is_empty() => {
                self.open_application(app)
            }
            TaskRequest::Browse { url, .. } => self.browse(url),
            TaskRequest::Search { query } => {
                self.browse(&format!("{}{}", SEARCH_URL, encode_component(query)))
            }
            // only the booking site is opened, reservation details are not forwarded yet
            TaskRequest::Book { .. } => self.open_application("booking"),
            TaskRequest::Weather { location } => self.with_app_url("weather", |base| {
                format!("{}/weather/today/{}", base, encode_component(location))
            }),
            TaskRequest::Maps { start, end } => self.with_app_url("maps", |base| {
                format!("{}/dir/{}/{}", base, encode_component(start), encode_component(end))
            }),
            TaskRequest::SystemCmd { command } => run_safe_command(command),
        }
    }

    fn browse(&self, url: &str) -> String {
        match self.opener.open(url) {
            Ok(()) => format!("Successfully opened {}", url),
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to open url");
                format!("Error opening URL: {}", e)
            }
        }
    }

    fn open_application(&self, app: &str) -> String {
        let app = app.to_lowercase();
        match self.config.app_url(&app) {
            Some(url) => self.browse(url),
            None => format!("Application '{}' not found in configured apps", app),
        }
    }

    fn with_app_url(&self, app: &str, build: impl FnOnce(&str) -> String) -> String {
        match self.config.app_url(app) {
            Some(base) => self.browse(&build(base.trim_end_matches('/'))),
            None => format!("Application '{}' not found in configured apps", app),
        }
    }
}
