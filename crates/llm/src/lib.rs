//! scout-llm — the resilient model-invocation layer of scout.
//!
//! ARCHITECTURAL RULE: no other scout service calls the Anthropic API
//! directly. Every model interaction goes through this crate: tier selection
//! via the registry, exactly one request per engine call, cost accounting on
//! every response, and a single validate-then-retry fallback on top.
//!
//! Callers build an [`InvocationRequest`], name a fallback tier, and receive
//! the provider text together with the spend it incurred. Cost figures are
//! returned, not persisted — recording them is the caller's job.

pub mod client;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod registry;

pub use client::{InvocationRequest, InvocationResult, Invoker, LlmClient, DEFAULT_MAX_TOKENS};
pub use config::LlmConfig;
pub use errors::LlmError;
pub use fallback::{clean_json_fences, invoke_with_fallback, is_valid_json, FallbackResult};
pub use registry::{ModelSpec, ModelTier};
