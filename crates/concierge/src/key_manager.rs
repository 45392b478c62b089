use std::env;
use thiserror::Error;
#[cfg(test)]
use mockall::automock;

#[derive(Error, Debug, PartialEq)]
pub enum KeyManagerError {
    #[error("Could not find {0} in the environment or a .env file")]
    Missing(String),

    #[error("Failed to access environment variable: {0}")]
    EnvVarAccess(String),
}

#[cfg_attr(test, automock)]
pub trait Environment: Send + Sync {
    fn get_var(&self, key: &str) -> std::result::Result<String, env::VarError>;
}

pub struct RealEnvironment;

impl Environment for RealEnvironment {
    fn get_var(&self, key: &str) -> std::result::Result<String, env::VarError> {
        env::var(key)
    }
}

/// Load a `.env` file from the working directory or its parents, if there is one
pub fn load_dotenv() {
    if let Err(e) = dotenv::dotenv() {
        tracing::debug!("no .env file loaded: {}", e);
    }
}

pub fn get_api_key_default(api_key_name: &str) -> Result<String, KeyManagerError> {
    load_dotenv();
    get_api_key(api_key_name, &RealEnvironment)
}

/// Read a secret from the environment. Blank values count as missing.
pub fn get_api_key(
    api_key_name: &str,
    env: &impl Environment,
) -> Result<String, KeyManagerError> {
    match env.get_var(api_key_name) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        Ok(_) | Err(env::VarError::NotPresent) => {
            Err(KeyManagerError::Missing(api_key_name.to_string()))
        }
        Err(e @ env::VarError::NotUnicode(_)) => Err(KeyManagerError::EnvVarAccess(format!(
            "{}: {}",
            api_key_name, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::*;
    use std::ffi::OsString;

    const TEST_KEY: &str = "TEST_KEY";

    #[test]
    fn test_get_api_key_present() {
        let mut mock_env = MockEnvironment::new();
        mock_env
            .expect_get_var()
            .with(eq(TEST_KEY))
            .times(1)
            .return_once(|_| Ok("env_value".to_string()));

        let result = get_api_key(TEST_KEY, &mock_env);
        assert_eq!(result, Ok("env_value".to_string()));
    }

    #[test]
    fn test_get_api_key_missing() {
        let mut mock_env = MockEnvironment::new();
        mock_env
            .expect_get_var()
            .with(eq(TEST_KEY))
            .times(1)
            .return_once(|_| Err(env::VarError::NotPresent));

        let result = get_api_key(TEST_KEY, &mock_env);
        assert_eq!(result, Err(KeyManagerError::Missing(TEST_KEY.to_string())));
    }

    #[test]
    fn test_get_api_key_blank_is_missing() {
        let mut mock_env = MockEnvironment::new();
        mock_env
            .expect_get_var()
            .return_once(|_| Ok("   ".to_string()));

        assert!(matches!(
            get_api_key(TEST_KEY, &mock_env),
            Err(KeyManagerError::Missing(_))
        ));
    }

    #[test]
    fn test_get_api_key_not_unicode() {
        let mut mock_env = MockEnvironment::new();
        mock_env
            .expect_get_var()
            .return_once(|_| Err(env::VarError::NotUnicode(OsString::from("x"))));

        assert!(matches!(
            get_api_key(TEST_KEY, &mock_env),
            Err(KeyManagerError::EnvVarAccess(_))
        ));
    }
}
