use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("Invalid server address {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Environment variable that sets a dotted configuration path
pub fn to_env_var(field_path: &str) -> String {
    format!("CONCIERGE_{}", field_path.replace('.', "__").to_uppercase())
}
