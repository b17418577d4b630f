use std::time::Instant;

use serde_json::json;
use tracing::debug;

use codecoach_core::{AgentConfiguration, AgentResponse, ConfidenceScorer, OrchestrationDecision, SessionContext};
use codecoach_gateway::{CompletionGateway, CompletionRequest};

use crate::prompts;
use crate::strategy::StrategyProfile;

const CONTEXT_ANALYSIS_MAX_TOKENS: u32 = 600;
const CONTEXT_ANALYSIS_TEMPERATURE: f64 = 0.3;
const DEFAULT_COMPLETION_MAX_TOKENS: u32 = 2000;
const DEFAULT_COMPLETION_TEMPERATURE: f64 = 0.7;
const PIPELINE_MAX_RETRIES: u32 = 2;

/// Executes one routed request against its strategy profile: a scoped
/// context analysis, the main completion, then deterministic extraction,
/// scoring, and metadata assembly.
#[derive(Clone)]
pub struct AgentPipeline {
    gateway: CompletionGateway,
}

impl AgentPipeline {
    pub fn new(gateway: CompletionGateway) -> Self {
        Self { gateway }
    }

    pub async fn process(
        &self,
        profile: &StrategyProfile,
        context: &SessionContext,
        decision: &OrchestrationDecision,
    ) -> AgentResponse {
        let started = Instant::now();
        let config = &decision.agent_config;

        let context_analysis = self.analyze_context(profile, context).await;

        let max_tokens = completion_max_tokens(config);
        let temperature =
            config.param_f64("temperature").unwrap_or(DEFAULT_COMPLETION_TEMPERATURE);
        let request =
            CompletionRequest::new((profile.build_user_prompt)(context, config), max_tokens, temperature)
                .with_system_prompt(profile.system_prompt);

        let completion = match self.gateway.complete(&request, PIPELINE_MAX_RETRIES).await {
            Ok(completion) => completion,
            Err(failure) => {
                let elapsed = started.elapsed().as_millis() as u64;
                let mut response = AgentResponse::failure(
                    profile.kind,
                    format!("LLM error: {}", failure.message),
                    elapsed,
                );
                response.append_metadata("agent_config", to_value(config));
                response.append_metadata("dynamic_processing", json!(true));
                return response;
            }
        };

        debug!(
            event_name = "pipeline.completion_received",
            agent = %profile.kind,
            total_tokens = completion.usage.total_tokens,
            "strategy completion received"
        );

        let response_data = (profile.extract)(&completion.text, context, config);
        let scorer = ConfidenceScorer::new(profile.technical_terms);
        let confidence = scorer.score(&completion.text, context, config);
        let elapsed = started.elapsed().as_millis() as u64;

        let mut response =
            AgentResponse::success(profile.kind, completion.text.clone(), confidence, elapsed);
        response.append_metadata("agent_config", to_value(config));
        response.append_metadata("context_analysis", context_analysis);
        response.append_metadata(
            "orchestration_decision",
            serde_json::to_value(decision).unwrap_or(serde_json::Value::Null),
        );
        response.append_metadata("response_data", response_data);
        response.append_metadata(
            "token_usage",
            serde_json::to_value(completion.usage).unwrap_or(serde_json::Value::Null),
        );
        response.append_metadata("dynamic_processing", json!(true));
        response
    }

    /// Strategy-scoped context analysis. Best-effort: a failed or
    /// unstructured analysis degrades to a descriptive JSON value and never
    /// fails the request.
    async fn analyze_context(
        &self,
        profile: &StrategyProfile,
        context: &SessionContext,
    ) -> serde_json::Value {
        let request = CompletionRequest::new(
            prompts::agent_context_analysis_prompt(context),
            CONTEXT_ANALYSIS_MAX_TOKENS,
            CONTEXT_ANALYSIS_TEMPERATURE,
        )
        .with_system_prompt(prompts::agent_context_system_prompt(profile.kind));

        match self.gateway.complete(&request, PIPELINE_MAX_RETRIES).await {
            Ok(completion) => serde_json::from_str(&completion.text)
                .unwrap_or_else(|_| json!({ "analysis_text": completion.text, "structured": false })),
            Err(failure) => json!({ "error": format!("Context analysis failed: {}", failure.message) }),
        }
    }
}

fn to_value(config: &AgentConfiguration) -> serde_json::Value {
    serde_json::to_value(config).unwrap_or(serde_json::Value::Null)
}

/// A model-supplied token budget that does not fit in u32 is treated as
/// absent rather than truncated.
fn completion_max_tokens(config: &AgentConfiguration) -> u32 {
    config
        .param_u64("max_tokens")
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(DEFAULT_COMPLETION_MAX_TOKENS)
}
