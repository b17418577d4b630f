use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use codecoach_core::routing::{decision_from_prose, decision_from_request, parse_decision};
use codecoach_core::{
    AgentResponse, InteractionRecord, InteractionSink, OrchestrationDecision, SessionContext,
};
use codecoach_gateway::{CompletionGateway, CompletionRequest};

use crate::pipeline::AgentPipeline;
use crate::prompts;
use crate::strategy::StrategyRegistry;

const SESSION_ANALYSIS_MAX_TOKENS: u32 = 800;
const SESSION_ANALYSIS_TEMPERATURE: f64 = 0.3;
const ROUTING_MAX_TOKENS: u32 = 1000;
const ROUTING_TEMPERATURE: f64 = 0.2;
const ORCHESTRATOR_MAX_RETRIES: u32 = 2;

/// Front door for one coaching request: analyze, route, execute, record.
///
/// Every request produces a structurally valid [`AgentResponse`], even when
/// the model misbehaves at each step. Routing degrades through three layers:
/// strict JSON decision, keyword scan of the model's prose, keyword scan of
/// the raw request.
pub struct Orchestrator {
    gateway: CompletionGateway,
    registry: StrategyRegistry,
    pipeline: AgentPipeline,
    history: Arc<dyn InteractionSink>,
}

impl Orchestrator {
    pub fn new(gateway: CompletionGateway, history: Arc<dyn InteractionSink>) -> Self {
        let pipeline = AgentPipeline::new(gateway.clone());
        Self { gateway, registry: StrategyRegistry::standard(), pipeline, history }
    }

    pub async fn handle_request(
        &self,
        user_request: &str,
        context: &SessionContext,
    ) -> AgentResponse {
        let started = Instant::now();
        let correlation_id = Uuid::new_v4().to_string();

        let context_analysis = self.analyze_session(context).await;
        let decision = self.decide(user_request, context).await;

        info!(
            event_name = "orchestrator.routed",
            correlation_id = %correlation_id,
            selected_agent = %decision.selected_agent,
            fallback_used = decision.fallback_used,
            "request routed"
        );

        let profile = self.registry.resolve(decision.selected_agent);
        let mut response = self.pipeline.process(profile, context, &decision).await;

        response.append_metadata(
            "orchestration_decision",
            serde_json::to_value(&decision).unwrap_or(serde_json::Value::Null),
        );
        response.append_metadata("context_analysis", context_analysis);
        response.append_metadata("dynamic_routing", json!(true));
        response.processing_time_ms = started.elapsed().as_millis() as u64;

        self.record_interaction(&correlation_id, user_request, context, &decision, &response);
        response
    }

    /// Session-level context analysis, shared with the response metadata.
    /// Best-effort like the strategy-scoped one.
    async fn analyze_session(&self, context: &SessionContext) -> serde_json::Value {
        let request = CompletionRequest::new(
            prompts::context_extraction_prompt(context),
            SESSION_ANALYSIS_MAX_TOKENS,
            SESSION_ANALYSIS_TEMPERATURE,
        )
        .with_system_prompt(prompts::CONTEXT_ANALYSIS_SYSTEM_PROMPT);

        match self.gateway.complete(&request, ORCHESTRATOR_MAX_RETRIES).await {
            Ok(completion) => serde_json::from_str(&completion.text)
                .unwrap_or_else(|_| json!({ "analysis_text": completion.text, "structured": false })),
            Err(failure) => {
                json!({
                    "error": format!("Context analysis failed: {}", failure.message),
                    "raw_context": serde_json::to_value(context)
                        .unwrap_or(serde_json::Value::Null),
                })
            }
        }
    }

    async fn decide(&self, user_request: &str, context: &SessionContext) -> OrchestrationDecision {
        let request = CompletionRequest::new(
            prompts::orchestrator_prompt(user_request, context),
            ROUTING_MAX_TOKENS,
            ROUTING_TEMPERATURE,
        )
        .with_system_prompt(prompts::ORCHESTRATOR_SYSTEM_PROMPT);

        match self.gateway.complete(&request, ORCHESTRATOR_MAX_RETRIES).await {
            Ok(completion) => parse_decision(&completion.text).unwrap_or_else(|error| {
                warn!(
                    event_name = "orchestrator.decision_parse_failed",
                    error = %error,
                    "routing output was not a valid decision, falling back to keyword routing"
                );
                decision_from_prose(&completion.text)
            }),
            Err(failure) => {
                warn!(
                    event_name = "orchestrator.routing_call_failed",
                    kind = ?failure.kind,
                    "routing call failed, falling back to request keywords"
                );
                decision_from_request(user_request)
            }
        }
    }

    /// Best-effort history write; a sink failure is logged and swallowed.
    fn record_interaction(
        &self,
        correlation_id: &str,
        user_request: &str,
        context: &SessionContext,
        decision: &OrchestrationDecision,
        response: &AgentResponse,
    ) {
        let record = InteractionRecord::new(
            correlation_id,
            context.user_id.clone(),
            user_request,
            response.agent_kind,
            response.success,
            response.confidence_score,
            decision.fallback_used,
        );
        if let Err(error) = self.history.record(record) {
            warn!(
                event_name = "orchestrator.history_record_failed",
                correlation_id = %correlation_id,
                error = %error,
                "failed to record interaction"
            );
        }
    }
}
