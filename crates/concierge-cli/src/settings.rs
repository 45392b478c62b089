use anyhow::{Context, Result};
use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};

use concierge::config::AgentConfig;

pub const CONFIG_PATH: &str = ".config/concierge/config.yaml";

pub fn config_path() -> Result<PathBuf> {
    let mut path = dirs::home_dir().context("Failed to find home directory")?;
    path.push(CONFIG_PATH);
    Ok(path)
}

/// Read the agent configuration. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AgentConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no configuration file, using defaults");
        return Ok(AgentConfig::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&contents).with_context(|| format!("Invalid configuration in {}", path.display()))
}

pub fn save_config(path: &Path, config: &AgentConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let yaml_string = serde_yaml::to_string(config)?;
    fs::write(path, yaml_string)?;
    Ok(())
}

/// Command line flags win over the file
pub fn apply_overrides(
    config: &mut AgentConfig,
    model: Option<&str>,
    base_url: Option<&str>,
    skip_confirmation: bool,
) {
    if let Some(model) = model {
        config.model = model.to_string();
    }
    if let Some(base_url) = base_url {
        config.base_url = base_url.to_string();
    }
    if skip_confirmation {
        config.require_confirmation = false;
    }
}
