use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod confirm;
mod prompt;
mod session;
mod settings;

use commands::configure::handle_configure;
use commands::session::{build_session, SessionOptions};
use commands::version::print_version;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ~/.config/concierge/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// OpenRouter API key (can also be set via OPENROUTER_API_KEY or a .env file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model to use, overriding the configuration file
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Base URL of the completion API, overriding the configuration file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Run tasks without asking for confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Configure the model and endpoint
    #[command(about = "Configure the model and endpoint")]
    Configure,

    /// Start an interactive session
    #[command(about = "Start an interactive session")]
    Session,

    /// Send a single message and exit
    #[command(about = "Send a single message and exit")]
    Run {
        /// The message to send
        #[arg(short, long)]
        message: String,
    },

    /// Print the version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    concierge::key_manager::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = SessionOptions {
        config_path: cli.config,
        api_key: cli.api_key,
        model: cli.model,
        base_url: cli.base_url,
        yes: cli.yes,
    };

    match cli.command {
        Some(Command::Configure) => handle_configure(&options).await,
        Some(Command::Run { message }) => {
            let mut session = build_session(&options, false)?;
            session.headless_start(&message).await
        }
        Some(Command::Session) => {
            let mut session = build_session(&options, true)?;
            session.start().await
        }
        Some(Command::Version) => {
            print_version();
            Ok(())
        }
        None => {
            let mut session = build_session(&options, true)?;
            session.start().await
        }
    }
}
