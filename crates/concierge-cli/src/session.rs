use anyhow::Result;

use crate::prompt::{InputType, Prompt};
use concierge::agent::Agent;
use concierge::models::message::Message;

pub struct Session<'a> {
    agent: Agent,
    prompt: Box<dyn Prompt + 'a>,
}

impl<'a> Session<'a> {
    pub fn new(agent: Agent, prompt: Box<dyn Prompt + 'a>) -> Self {
        Session { agent, prompt }
    }

    pub async fn start(&mut self) -> Result<()> {
        self.setup_session();

        loop {
            let input = self.prompt.get_input()?;
            match input.input_type {
                InputType::Message => {
                    if let Some(content) = &input.content {
                        self.process_message(content).await;
                    }
                }
                InputType::Exit => break,
                InputType::AskAgain => continue,
            }
        }
        self.close_session();
        Ok(())
    }

    /// Process a single message without prompting
    pub async fn headless_start(&mut self, message: &str) -> Result<()> {
        self.process_message(message).await;
        self.prompt.close();
        Ok(())
    }

    async fn process_message(&mut self, content: &str) {
        self.prompt.show_busy();
        let reply = tokio::select! {
            reply = self.agent.process_command(content) => Some(reply),
            _ = tokio::signal::ctrl_c() => None,
        };
        self.prompt.hide_busy();

        match reply {
            Some(reply) => self.prompt.render(&Message::assistant(reply)),
            None => self.prompt.render(&raw_message(
                " Interrupt: the request was abandoned.\n",
            )),
        }
    }

    fn setup_session(&mut self) {
        let model = self.agent.config().model.clone();
        self.prompt
            .render(&raw_message(&format!("Starting session with {}\n", model)));
        self.prompt.ready();
    }

    fn close_session(&mut self) {
        let turns = self.agent.history().len();
        self.prompt
            .render(&raw_message(&format!("Closing session after {} turns.\n", turns)));
        self.prompt.close();
    }
}

fn raw_message(content: &str) -> Message {
    Message::assistant(content)
}
