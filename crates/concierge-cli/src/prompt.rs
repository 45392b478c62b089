use anyhow::Result;
use concierge::models::message::Message;

pub mod cliclack;

pub trait Prompt {
    fn render(&mut self, message: &Message);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&mut self);
    fn close(&self);
    fn ready(&self) {
        println!("\n");
        println!("Concierge is ready! Ask for something, or type \"exit\" to leave.");
        println!("\n");
    }
}

#[derive(Debug, PartialEq)]
pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Only set for messages
}

#[derive(Debug, PartialEq)]
pub enum InputType {
    AskAgain, // Ask the user for input again. Control flow command.
    Message,  // User sent a message
    Exit,     // User wants to exit the session
}

impl Input {
    /// Interpret a line typed by the user
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let is_exit = ["exit", "/exit", "/quit"]
            .iter()
            .any(|word| text.eq_ignore_ascii_case(word));

        if is_exit {
            Input {
                input_type: InputType::Exit,
                content: None,
            }
        } else if text.is_empty() {
            Input {
                input_type: InputType::AskAgain,
                content: None,
            }
        } else {
            Input {
                input_type: InputType::Message,
                content: Some(text.to_string()),
            }
        }
    }
}

pub enum Theme {
    Light,
    Dark,
}
