use super::role::Role;
use chrono::Utc;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
/// A single turn exchanged with the model
pub struct Message {
    pub role: Role,
    pub created: i64,
    pub content: String,
}

impl Message {
    fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Message {
            role,
            created: Utc::now().timestamp(),
            content: content.into(),
        }
    }

    /// Create a new user message with the current timestamp
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Create a new system message with the current timestamp
    pub fn system<S: Into<String>>(text: S) -> Self {
        Self::new(Role::System, text)
    }

    pub fn text(&self) -> &str {
        &self.content
    }
}
