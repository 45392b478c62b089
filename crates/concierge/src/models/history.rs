use super::message::Message;

/// The ordered record of turns exchanged with the model.
///
/// Turns are only ever appended. Replay to the endpoint can be limited to a window of the
/// most recent turns, which leaves the stored record untouched.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent `window` turns, or every turn when no window is set
    pub fn window(&self, window: Option<usize>) -> &[Message] {
        match window {
            Some(size) if size < self.messages.len() => {
                &self.messages[self.messages.len() - size..]
            }
            _ => &self.messages,
        }
    }
}
