//! End-to-end orchestration behavior over a scripted backend: routing
//! layers, degraded responses, and history recording.

use std::sync::Arc;

use codecoach_agent::Orchestrator;
use codecoach_core::{
    AgentKind, Difficulty, InMemoryInteractionSink, ProblemInfo, SessionContext, UserCode,
};
use codecoach_gateway::{CompletionErrorKind, CompletionGateway, ScriptedBackend};
use serde_json::json;

fn context_with_code() -> SessionContext {
    SessionContext {
        user_id: Some("user-42".to_string()),
        problem: Some(ProblemInfo {
            title: "Two Sum".to_string(),
            description: "Find indices of two numbers adding to target.".to_string(),
            difficulty: Some(Difficulty::Medium),
            tags: vec!["array".to_string()],
        }),
        user_code: Some(UserCode {
            code: "def two_sum(nums, target):\n    for i in nums:\n        pass".to_string(),
            language: "python".to_string(),
            is_working: false,
        }),
        ..SessionContext::default()
    }
}

fn orchestrator_with(
    backend: Arc<ScriptedBackend>,
) -> (Orchestrator, Arc<InMemoryInteractionSink>) {
    let sink = Arc::new(InMemoryInteractionSink::default());
    let orchestrator = Orchestrator::new(CompletionGateway::new(backend), sink.clone());
    (orchestrator, sink)
}

// Call order per request: session analysis, routing, strategy context
// analysis, strategy completion.

#[tokio::test]
async fn well_formed_routing_reaches_the_selected_strategy() {
    let routing = json!({
        "selected_agent": "COMPLEXITY",
        "reasoning": "user asked about performance",
        "agent_config": { "specific_focus": "time complexity" }
    })
    .to_string();
    let routing: &'static str = Box::leak(routing.into_boxed_str());

    let backend = Arc::new(ScriptedBackend::sequence([
        Ok("session analysis"),
        Ok(routing),
        Ok("strategy analysis"),
        Ok("The time complexity is O(n^2) because of the nested loops."),
    ]));
    let (orchestrator, sink) = orchestrator_with(backend);

    let response =
        orchestrator.handle_request("how fast is this?", &context_with_code()).await;

    assert!(response.success);
    assert_eq!(response.agent_kind, AgentKind::Complexity);
    assert_eq!(
        response.metadata["orchestration_decision"]["fallback_used"],
        json!(false)
    );
    assert_eq!(response.metadata["dynamic_routing"], json!(true));
    assert!(response.metadata["response_data"]["time_complexity"]
        .as_str()
        .unwrap()
        .contains("O(n^2)"));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].agent_used, AgentKind::Complexity);
    assert!(!records[0].fallback_used);
    assert_eq!(records[0].user_id.as_deref(), Some("user-42"));
}

#[tokio::test]
async fn prose_routing_output_falls_back_to_keyword_scan() {
    let backend = Arc::new(ScriptedBackend::sequence([
        Ok("session analysis"),
        Ok("The user seems stuck, so I would offer guidance rather than a full answer."),
        Ok("strategy analysis"),
        Ok("Here is a gentle hint: think about complements."),
    ]));
    let (orchestrator, sink) = orchestrator_with(backend);

    let response = orchestrator.handle_request("I need help", &context_with_code()).await;

    assert!(response.success);
    assert_eq!(response.agent_kind, AgentKind::Hint);
    assert_eq!(
        response.metadata["orchestration_decision"]["fallback_used"],
        json!(true)
    );
    assert!(sink.records()[0].fallback_used);
}

#[tokio::test(start_paused = true)]
async fn failed_routing_call_falls_back_to_request_keywords() {
    let backend = Arc::new(ScriptedBackend::sequence([
        Ok("session analysis"),
        Err((CompletionErrorKind::InvalidRequest, "routing rejected")),
        Ok("strategy analysis"),
        Ok("You could make this faster with a single pass and a hash map."),
    ]));
    let (orchestrator, _sink) = orchestrator_with(backend);

    let response = orchestrator
        .handle_request("can you optimize my loop?", &context_with_code())
        .await;

    assert!(response.success);
    assert_eq!(response.agent_kind, AgentKind::Optimize);
    let decision = &response.metadata["orchestration_decision"];
    assert_eq!(decision["fallback_used"], json!(true));
    assert!(decision["reasoning"]
        .as_str()
        .unwrap()
        .contains("can you optimize my loop?"));
}

#[tokio::test(start_paused = true)]
async fn strategy_completion_failure_degrades_but_stays_structured() {
    let routing = json!({
        "selected_agent": "SOLUTION",
        "reasoning": "r",
        "agent_config": {}
    })
    .to_string();
    let routing: &'static str = Box::leak(routing.into_boxed_str());

    let backend = Arc::new(ScriptedBackend::sequence([
        Ok("session analysis"),
        Ok(routing),
        Ok("strategy analysis"),
        Err((CompletionErrorKind::RateLimit, "throttled")),
    ]));
    let (orchestrator, sink) = orchestrator_with(backend);

    let response = orchestrator.handle_request("explain the solution", &context_with_code()).await;

    assert!(!response.success);
    assert_eq!(response.agent_kind, AgentKind::Solution);
    assert_eq!(response.confidence_score, 0.0);
    assert!(response.response_text.contains("throttled"));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(!records[0].success);
    assert_eq!(records[0].confidence_score, 0.0);
}

#[tokio::test(start_paused = true)]
async fn failed_session_analysis_degrades_to_an_error_with_the_raw_context() {
    let backend = Arc::new(ScriptedBackend::sequence([
        Err((CompletionErrorKind::InvalidRequest, "analysis rejected")),
        Ok("I would offer guidance since the user is stuck."),
        Ok("strategy analysis"),
        Ok("Hint: think about complements."),
    ]));
    let (orchestrator, _sink) = orchestrator_with(backend);

    let response = orchestrator.handle_request("I'm stuck", &context_with_code()).await;

    assert!(response.success);
    let analysis = &response.metadata["context_analysis"];
    assert!(analysis["error"].as_str().unwrap().contains("analysis rejected"));
    assert_eq!(analysis["raw_context"]["user_id"], json!("user-42"));
    assert_eq!(analysis["raw_context"]["problem"]["title"], json!("Two Sum"));
}

#[tokio::test]
async fn identical_requests_route_identically() {
    // Same scripted answers twice over; routing and confidence must agree.
    let run = |_: usize| async {
        let backend = Arc::new(ScriptedBackend::sequence([
            Ok("session analysis"),
            Ok("I would offer guidance since the user is stuck."),
            Ok("strategy analysis"),
            Ok("Hint: map each value to its index while scanning."),
        ]));
        let (orchestrator, _sink) = orchestrator_with(backend);
        orchestrator.handle_request("I'm stuck", &context_with_code()).await
    };

    let first = run(0).await;
    let second = run(1).await;

    assert_eq!(first.agent_kind, second.agent_kind);
    assert_eq!(first.confidence_score, second.confidence_score);
    assert_eq!(first.response_text, second.response_text);
}

#[tokio::test]
async fn routing_never_yields_an_unknown_agent() {
    for request in ["", "zzz", "please do the thing", "interview me"] {
        let backend = Arc::new(ScriptedBackend::sequence([
            Ok("session analysis"),
            Err((CompletionErrorKind::InvalidRequest, "no routing")),
            Ok("strategy analysis"),
            Ok("A generic but valid answer."),
        ]));
        let (orchestrator, _sink) = orchestrator_with(backend);
        let response = orchestrator.handle_request(request, &SessionContext::default()).await;
        assert!(AgentKind::ALL.contains(&response.agent_kind));
    }
}
