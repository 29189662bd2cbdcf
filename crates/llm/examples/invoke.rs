//! One fallback-guarded invocation against the live API.
//!
//! Usage: ANTHROPIC_API_KEY=... cargo run --example invoke

use anyhow::Result;
use scout_llm::{invoke_with_fallback, is_valid_json, InvocationRequest, LlmClient, ModelTier};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = LlmClient::from_env()?;

    let request = InvocationRequest::new(
        ModelTier::Fast,
        "Summarize this job posting as JSON with keys \"title\" and \"seniority\": \
         Senior Rust Engineer — own the matching pipeline end to end.",
    )
    .with_system("Respond with valid JSON only. Do not use markdown code fences.")
    .with_max_tokens(300);

    let outcome = invoke_with_fallback(&client, request, ModelTier::Capable, is_valid_json).await?;

    info!(
        "used_fallback={} cost_usd={:.4}",
        outcome.used_fallback, outcome.invocation.estimated_cost_usd
    );
    println!("{}", outcome.invocation.text);

    Ok(())
}
