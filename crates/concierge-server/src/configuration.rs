use crate::error::{to_env_var, ConfigError};
use concierge::config::AgentConfig;
use concierge::key_manager::{get_api_key, RealEnvironment};
use concierge::providers::configs::{OpenAiProviderConfig, DEFAULT_APP_TITLE, OPENROUTER_API_KEY};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(address))
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    /// Falls back to OPENROUTER_API_KEY when unset
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_app_title")]
    pub app_title: String,
    #[serde(default)]
    pub referer: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            app_title: default_app_title(),
            referer: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub provider: ProviderSettings,
}

impl Settings {
    /// Layer defaults, then `concierge.toml` (or `config_file`), then CONCIERGE_* variables
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("concierge").required(false),
        };

        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .add_source(file)
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("CONCIERGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("agent.allowed_operations"),
            )
            .build()?;

        let settings: Self = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::Other(err)
        })?;
        Ok(settings)
    }

    /// The configured key, or OPENROUTER_API_KEY from the environment
    pub fn api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = self.provider.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(key.clone());
        }
        get_api_key(OPENROUTER_API_KEY, &RealEnvironment).map_err(|_| ConfigError::MissingEnvVar {
            env_var: format!("{} or {}", OPENROUTER_API_KEY, to_env_var("provider.api_key")),
        })
    }

    pub fn provider_config(&self, api_key: String) -> OpenAiProviderConfig {
        OpenAiProviderConfig {
            app_title: self.provider.app_title.clone(),
            referer: self.provider.referer.clone(),
            ..OpenAiProviderConfig::from_agent_config(&self.agent, api_key)
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_app_title() -> String {
    DEFAULT_APP_TITLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;

    fn clean_env() {
        for (key, _) in env::vars() {
            if key.starts_with("CONCIERGE_") || key == OPENROUTER_API_KEY {
                env::remove_var(&key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        clean_env();

        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.agent, AgentConfig::default());
        assert_eq!(settings.provider.app_title, "Concierge");
        assert!(settings.provider.api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        clean_env();
        env::set_var("CONCIERGE_SERVER__PORT", "8080");
        env::set_var("CONCIERGE_AGENT__MODEL", "openai/gpt-4o-mini");
        env::set_var("CONCIERGE_AGENT__TEMPERATURE", "0.2");
        env::set_var("CONCIERGE_AGENT__HISTORY_WINDOW", "8");
        env::set_var("CONCIERGE_AGENT__STRICT_JSON", "true");
        env::set_var("CONCIERGE_AGENT__ALLOWED_OPERATIONS", "search,weather");
        env::set_var("CONCIERGE_PROVIDER__API_KEY", "test-key");

        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.agent.model, "openai/gpt-4o-mini");
        assert_eq!(settings.agent.temperature, 0.2);
        assert_eq!(settings.agent.history_window, Some(8));
        assert!(settings.agent.strict_json);
        assert_eq!(settings.agent.allowed_operations, vec!["search", "weather"]);
        // untouched fields keep their defaults
        assert_eq!(settings.agent.max_tokens, 1000);
        assert_eq!(settings.api_key().unwrap(), "test-key");

        clean_env();
    }

    #[test]
    #[serial]
    fn test_file_then_environment() {
        clean_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concierge.toml");
        fs::write(
            &path,
            r#"
[server]
port = 7000

[agent]
model = "mistralai/mistral-7b-instruct"
max_consecutive_requests = 5
require_confirmation = false

[provider]
referer = "https://example.com"
"#,
        )
        .unwrap();
        env::set_var("CONCIERGE_SERVER__PORT", "7001");

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.server.port, 7001);
        assert_eq!(settings.agent.model, "mistralai/mistral-7b-instruct");
        assert_eq!(settings.agent.max_consecutive_requests, Some(5));
        assert!(!settings.agent.require_confirmation);

        let provider = settings.provider_config("key".to_string());
        assert_eq!(provider.referer.as_deref(), Some("https://example.com"));
        assert_eq!(provider.model, "mistralai/mistral-7b-instruct");
        assert_eq!(provider.host, "https://openrouter.ai/api/v1");

        clean_env();
    }

    #[test]
    #[serial]
    fn test_missing_config_file() {
        clean_env();
        let result = Settings::load(Some(Path::new("/nonexistent/concierge.toml")));
        assert!(matches!(result, Err(ConfigError::Other(_))));
    }

    #[test]
    #[serial]
    fn test_api_key_fallback() {
        clean_env();
        let settings = Settings::load(None).unwrap();

        match settings.api_key() {
            Err(ConfigError::MissingEnvVar { env_var }) => {
                assert_eq!(env_var, "OPENROUTER_API_KEY or CONCIERGE_PROVIDER__API_KEY");
            }
            other => panic!("Expected MissingEnvVar, got {:?}", other),
        }

        env::set_var(OPENROUTER_API_KEY, "from-env");
        assert_eq!(settings.api_key().unwrap(), "from-env");
        clean_env();
    }

    #[test]
    fn test_socket_addr_conversion() {
        let server_settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let addr = server_settings.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");

        let invalid = ServerSettings {
            host: "not a host".to_string(),
            port: 3000,
        };
        assert!(matches!(
            invalid.socket_addr(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }
}
