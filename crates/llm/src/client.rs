//! Invocation engine — builds one Messages API request per call, accounts
//! cost from provider-reported usage, and returns a normalized result.
//!
//! ARCHITECTURAL RULE: No other scout module may call the Anthropic API
//! directly. All model interactions MUST go through [`LlmClient`].
//!
//! This layer never retries. Retry-on-failure lives one layer up, in the
//! fallback controller.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::info;

use crate::config::LlmConfig;
use crate::errors::LlmError;
use crate::fallback::{clean_json_fences, invoke_with_fallback, is_valid_json};
use crate::registry::{ModelSpec, ModelTier};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default output-token cap for a single invocation.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

// ────────────────────────────────────────────────────────────────────────────
// Request / result types
// ────────────────────────────────────────────────────────────────────────────

/// One stateless model invocation. Every call is a single user turn —
/// no conversation history, no threading.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub tier: ModelTier,
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
}

impl InvocationRequest {
    pub fn new(tier: ModelTier, prompt: impl Into<String>) -> Self {
        InvocationRequest {
            tier,
            system: None,
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Normalized outcome of a successful invocation. `text` is the provider
/// text as received — callers that expect JSON clean it before decoding.
/// Cost figures are returned, never persisted here.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationResult {
    pub text: String,
    pub tier: ModelTier,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub estimated_cost_usd: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (Anthropic Messages API)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    // Providers may omit usage; missing counts read as 0 rather than failing
    // the whole invocation.
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl MessagesResponse {
    /// Extracts the text of the first text block, if any.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Invoker seam
// ────────────────────────────────────────────────────────────────────────────

/// Seam between the invocation engine and the fallback controller.
/// [`LlmClient`] is the production implementation; tests script stubs.
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(&self, request: &InvocationRequest) -> Result<InvocationResult, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single entry point for model calls in scout. Cheap to clone; calls
/// share nothing but the connection pool and the read-only registry, so
/// callers may invoke concurrently without coordination.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        LlmClient {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: config.api_key,
        }
    }

    /// Builds a client from process environment. A missing API key fails
    /// here, before any request exists to send.
    pub fn from_env() -> Result<Self, LlmError> {
        Ok(LlmClient::new(LlmConfig::from_env()?))
    }

    /// Sends exactly one Messages API request and returns the normalized result.
    ///
    /// The calling task suspends until the provider responds or the transport
    /// times out. Once sent, a request runs to completion or failure — no
    /// cancellation mid-call.
    pub async fn invoke(&self, request: &InvocationRequest) -> Result<InvocationResult, LlmError> {
        let tier = request.tier;
        let spec = tier.spec();

        let body = MessagesRequest {
            model: spec.id,
            max_tokens: request.max_tokens,
            system: request.system.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                tier,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            // Surface the provider's own message when the error body parses
            let message = serde_json::from_str::<ApiError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(LlmError::Provider {
                tier,
                message: format!("API error (status {}): {message}", status.as_u16()),
            });
        }

        let decoded: MessagesResponse =
            response.json().await.map_err(|e| LlmError::Provider {
                tier,
                message: format!("malformed response body: {e}"),
            })?;

        let text = decoded
            .text()
            .ok_or_else(|| LlmError::Provider {
                tier,
                message: "response contained no text content".to_string(),
            })?
            .to_string();

        let cost = estimated_cost_usd(spec, decoded.usage.input_tokens, decoded.usage.output_tokens);

        // Cost ledger line — the only audit trail for spend.
        info!(
            "model invocation: tier={} model={} input_tokens={} output_tokens={} cost_usd={:.4}",
            tier, spec.id, decoded.usage.input_tokens, decoded.usage.output_tokens, cost
        );

        Ok(InvocationResult {
            text,
            tier,
            input_tokens: decoded.usage.input_tokens,
            output_tokens: decoded.usage.output_tokens,
            estimated_cost_usd: cost,
        })
    }

    /// Calls the model with JSON-validity fallback and decodes the cleaned
    /// text into `T`. The prompt must instruct the model to return valid JSON.
    pub async fn invoke_json<T: DeserializeOwned>(
        &self,
        request: InvocationRequest,
        fallback_tier: ModelTier,
    ) -> Result<T, LlmError> {
        let outcome = invoke_with_fallback(self, request, fallback_tier, is_valid_json).await?;
        let cleaned = clean_json_fences(&outcome.invocation.text);
        Ok(serde_json::from_str(&cleaned)?)
    }
}

#[async_trait]
impl Invoker for LlmClient {
    async fn invoke(&self, request: &InvocationRequest) -> Result<InvocationResult, LlmError> {
        LlmClient::invoke(self, request).await
    }
}

/// `(input × input rate + output × output rate) / 1_000_000`, from the token
/// counts the provider reported — never estimated from prompt length.
fn estimated_cost_usd(spec: &ModelSpec, input_tokens: u32, output_tokens: u32) -> f64 {
    (input_tokens as f64 * spec.input_price_per_mtok
        + output_tokens as f64 * spec.output_price_per_mtok)
        / 1_000_000.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
