use anyhow::Result;
use cliclack::spinner;
use console::style;

use crate::commands::session::SessionOptions;
use crate::settings::save_config;
use concierge::models::message::Message;
use concierge::providers::base::Provider;
use concierge::providers::configs::{OpenAiProviderConfig, OPENROUTER_API_KEY};
use concierge::providers::openai::OpenAiProvider;

pub async fn handle_configure(options: &SessionOptions) -> Result<()> {
    cliclack::intro(style(" configure-concierge ").on_cyan().black())?;

    let path = options.config_path()?;
    let mut config = options.agent_config()?;
    if path.exists() {
        cliclack::log::info(format!("Updating the existing configuration at {}", path.display()))?;
    }

    config.model = cliclack::input("Which model should we use?")
        .default_input(&config.model)
        .interact()?;
    config.base_url = cliclack::input("Completion API base URL:")
        .default_input(&config.base_url)
        .interact()?;
    config.require_confirmation = cliclack::confirm("Ask before running each task?")
        .initial_value(config.require_confirmation)
        .interact()?;

    // Confirm everything is configured correctly by calling the model
    match options.api_key() {
        Ok(api_key) => {
            let spin = spinner();
            spin.start("Checking your configuration...");
            let provider = OpenAiProvider::new(OpenAiProviderConfig::from_agent_config(&config, api_key))?;
            let message = Message::user(
                "Please give a nice welcome message (one sentence) and let them know they are all set",
            );
            match provider
                .complete("You are Concierge, an assistant that runs everyday tasks.", &[message])
                .await
            {
                Ok((reply, _usage)) => spin.stop(reply.text()),
                Err(e) => spin.error(format!("We could not connect: {}", e)),
            }
        }
        Err(_) => {
            cliclack::log::warning(format!(
                "{} is not set. Export it or add it to a .env file before starting a session.",
                OPENROUTER_API_KEY
            ))?;
        }
    }

    match save_config(&path, &config) {
        Ok(()) => cliclack::outro(format!("Configuration saved to: {}", path.display()))?,
        Err(e) => cliclack::outro(format!("Failed to save configuration: {}", e))?,
    }
    Ok(())
}
