use thiserror::Error;

use crate::registry::ModelTier;

/// Error type for the model-invocation layer.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Required configuration is absent. Raised before any network I/O; never retried.
    #[error("Required environment variable '{0}' is not set")]
    Configuration(String),

    /// Transport failure, non-2xx response, or a response body with no text content.
    /// The fallback controller answers this with exactly one retry on the fallback tier.
    #[error("Provider error on '{tier}' tier: {message}")]
    Provider { tier: ModelTier, message: String },

    /// Model output could not be decoded into the requested type.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
