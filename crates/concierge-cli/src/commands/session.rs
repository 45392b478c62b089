use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::confirm::CliclackConfirmer;
use crate::prompt::cliclack::CliclackPrompt;
use crate::session::Session;
use crate::settings::{apply_overrides, config_path, load_config};
use concierge::agent::Agent;
use concierge::config::AgentConfig;
use concierge::key_manager::get_api_key_default;
use concierge::opener::BrowserOpener;
use concierge::providers::configs::{OpenAiProviderConfig, OPENROUTER_API_KEY};
use concierge::providers::openai::OpenAiProvider;

/// Values gathered from the command line
pub struct SessionOptions {
    pub config_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub yes: bool,
}

impl SessionOptions {
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => config_path(),
        }
    }

    pub fn agent_config(&self) -> Result<AgentConfig> {
        let mut config = load_config(&self.config_path()?)?;
        apply_overrides(
            &mut config,
            self.model.as_deref(),
            self.base_url.as_deref(),
            self.yes,
        );
        Ok(config)
    }

    pub fn api_key(&self) -> Result<String> {
        match &self.api_key {
            Some(key) => Ok(key.clone()),
            None => get_api_key_default(OPENROUTER_API_KEY)
                .context("Provide an API key with --api-key or run `concierge configure`"),
        }
    }
}

pub fn build_agent(options: &SessionOptions, interactive: bool) -> Result<Agent> {
    let config = options.agent_config()?;
    let provider_config = OpenAiProviderConfig::from_agent_config(&config, options.api_key()?);
    let provider = OpenAiProvider::new(provider_config)?;

    let require_confirmation = config.require_confirmation;
    let agent = Agent::new(Arc::new(config), Arc::new(provider), Arc::new(BrowserOpener))?;

    // there is nobody to ask when running headless
    if interactive && require_confirmation {
        Ok(agent.with_confirmer(Box::new(CliclackConfirmer)))
    } else {
        Ok(agent)
    }
}

pub fn build_session<'a>(options: &SessionOptions, interactive: bool) -> Result<Session<'a>> {
    let agent = build_agent(options, interactive)?;
    Ok(Session::new(agent, Box::new(CliclackPrompt::new())))
}
