use crate::errors::LlmError;

/// Configuration for the invocation layer, loaded from environment variables.
/// The API key is checked here — before any request is built or sent.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
}

impl LlmConfig {
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(LlmConfig {
            api_key: require_env("ANTHROPIC_API_KEY")?,
        })
    }
}

fn require_env(key: &str) -> Result<String, LlmError> {
    std::env::var(key).map_err(|_| LlmError::Configuration(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_env_missing_is_a_configuration_error() {
        let result = require_env("SCOUT_LLM_TEST_UNSET_VAR");
        match result {
            Err(LlmError::Configuration(key)) => {
                assert_eq!(key, "SCOUT_LLM_TEST_UNSET_VAR");
            }
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_env_without_api_key_fails_before_any_client_exists() {
        std::env::remove_var("ANTHROPIC_API_KEY");
        let result = LlmConfig::from_env();
        match result {
            Err(LlmError::Configuration(key)) => assert_eq!(key, "ANTHROPIC_API_KEY"),
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_require_env_present_returns_value() {
        std::env::set_var("SCOUT_LLM_TEST_SET_VAR", "value");
        assert_eq!(require_env("SCOUT_LLM_TEST_SET_VAR").unwrap(), "value");
        std::env::remove_var("SCOUT_LLM_TEST_SET_VAR");
    }
}
