//! Fallback controller — validate-then-retry on top of the invocation engine.
//!
//! Two states: PRIMARY → done, or PRIMARY → FALLBACK → done. The fallback
//! call's own failure propagates uncaught; there is no second fallback level.
//! Unbounded retry chains against a paid API amplify spend, so the ceiling is
//! exactly one retry.

use serde::Serialize;
use tracing::warn;

use crate::client::{InvocationRequest, InvocationResult, Invoker};
use crate::errors::LlmError;
use crate::registry::ModelTier;

/// An [`InvocationResult`] plus which state produced it.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackResult {
    pub invocation: InvocationResult,
    pub used_fallback: bool,
}

/// Calls `request.tier`, validates the cleaned output, and on a provider
/// failure or a validation reject retries once against `fallback_tier`.
///
/// `validate` runs over the cleaned text (see [`clean_json_fences`]). The
/// fallback result is returned as-is: it is not re-validated, and its errors
/// surface to the caller. A [`LlmError::Configuration`] error propagates
/// immediately — switching tiers cannot supply a missing key.
pub async fn invoke_with_fallback<I, V>(
    invoker: &I,
    request: InvocationRequest,
    fallback_tier: ModelTier,
    validate: V,
) -> Result<FallbackResult, LlmError>
where
    I: Invoker + ?Sized,
    V: Fn(&str) -> bool,
{
    let primary_tier = request.tier;

    let reason = match invoker.invoke(&request).await {
        Ok(result) => {
            if validate(&clean_json_fences(&result.text)) {
                return Ok(FallbackResult {
                    invocation: result,
                    used_fallback: false,
                });
            }
            "output failed validation".to_string()
        }
        Err(e @ LlmError::Configuration(_)) => return Err(e),
        Err(e) => e.to_string(),
    };

    warn!("'{primary_tier}' tier failed ({reason}) — falling back to '{fallback_tier}'");

    let mut retry = request;
    retry.tier = fallback_tier;
    let invocation = invoker.invoke(&retry).await?;

    Ok(FallbackResult {
        invocation,
        used_fallback: true,
    })
}

/// Strips every ```json opening marker and every ``` fence marker, then trims.
/// Tolerates fence-free input and leaves the fenced content itself untouched.
/// Idempotent.
pub fn clean_json_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// The built-in default validator: the cleaned text parses as JSON.
pub fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
