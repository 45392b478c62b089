use std::io::{self, Write};

use anyhow::Result;
use bat::WrappingMode;
use cliclack::{input, spinner};
use concierge::models::message::Message;

use super::{Input, InputType, Prompt, Theme};

pub struct CliclackPrompt {
    spinner: cliclack::ProgressBar,
    theme: Theme,
}

impl CliclackPrompt {
    pub fn new() -> Self {
        CliclackPrompt {
            spinner: spinner(),
            theme: Theme::Dark,
        }
    }

    fn theme_name(&self) -> &'static str {
        match self.theme {
            Theme::Light => "GitHub",
            Theme::Dark => "zenburn",
        }
    }
}

fn print(content: &str, theme: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(theme)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();
    if printed.is_err() {
        println!("{}", content);
    }
}

fn print_help() {
    println!("Commands:");
    println!("exit - Exit the session (also /exit or /quit)");
    println!("/t - Toggle Light/Dark theme");
    println!("/? - Display this help message");
    println!("Ctrl+C - Abandon the request in flight");
}

impl Prompt for CliclackPrompt {
    fn render(&mut self, message: &Message) {
        print(message.text(), self.theme_name());
        println!();
        let _ = io::stdout().flush();
    }

    fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner.start("awaiting reply");
    }

    fn hide_busy(&mut self) {
        self.spinner.stop("");
    }

    fn get_input(&mut self) -> Result<Input> {
        let message_text: String = input("Concierge: [Help: /?]")
            .placeholder("")
            .required(false)
            .interact()?;

        match message_text.trim() {
            "/t" => {
                self.theme = match self.theme {
                    Theme::Light => {
                        println!("Switching to Dark theme");
                        Theme::Dark
                    }
                    Theme::Dark => {
                        println!("Switching to Light theme");
                        Theme::Light
                    }
                };
                Ok(Input {
                    input_type: InputType::AskAgain,
                    content: None,
                })
            }
            "/?" => {
                print_help();
                Ok(Input {
                    input_type: InputType::AskAgain,
                    content: None,
                })
            }
            _ => Ok(Input::parse(&message_text)),
        }
    }

    fn close(&self) {
        // No cleanup required
    }
}
