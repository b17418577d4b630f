//! Completion gateway: a single retrying front door to the configured LLM
//! provider. Backends translate one HTTP API each; the gateway owns retry,
//! backoff, and error classification so callers never see provider detail.

pub mod anthropic;
pub mod backend;
pub mod factory;
pub mod fixtures;
pub mod gateway;
pub mod ollama;
pub mod openai;
pub mod types;

pub use backend::CompletionBackend;
pub use factory::{gateway_from_config, GatewayBuildError};
pub use fixtures::ScriptedBackend;
pub use gateway::CompletionGateway;
pub use types::{
    Completion, CompletionErrorKind, CompletionFailure, CompletionRequest, CompletionResult,
    TokenUsage,
};
