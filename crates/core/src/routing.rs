//! Deterministic routing helpers: tolerant parsing of the orchestration
//! decision JSON and the keyword fallbacks applied when the model output is
//! malformed or the routing call fails entirely.

use thiserror::Error;

use crate::domain::decision::{AgentConfiguration, OrchestrationDecision};
use crate::domain::response::AgentKind;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecisionParseError {
    #[error("routing response was not valid JSON: {0}")]
    Json(String),
    #[error("routing decision missing required field `{0}`")]
    MissingField(&'static str),
    #[error("routing decision selected unknown agent `{0}`")]
    UnknownAgent(String),
    #[error("routing decision field `{field}` has invalid shape: {message}")]
    InvalidField { field: &'static str, message: String },
}

/// Parse a routing completion into a decision. All three required keys
/// (`selected_agent`, `reasoning`, `agent_config`) must be present; a partial
/// `agent_config` object is tolerated and filled with defaults.
pub fn parse_decision(text: &str) -> Result<OrchestrationDecision, DecisionParseError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|error| DecisionParseError::Json(error.to_string()))?;

    let selected_label = value
        .get("selected_agent")
        .and_then(|field| field.as_str())
        .ok_or(DecisionParseError::MissingField("selected_agent"))?;
    let selected_agent = AgentKind::from_label(selected_label)
        .map_err(|error| DecisionParseError::UnknownAgent(error.0))?;

    let reasoning = value
        .get("reasoning")
        .and_then(|field| field.as_str())
        .ok_or(DecisionParseError::MissingField("reasoning"))?
        .to_string();

    let config_value = value
        .get("agent_config")
        .cloned()
        .ok_or(DecisionParseError::MissingField("agent_config"))?;
    let agent_config: AgentConfiguration = serde_json::from_value(config_value).map_err(|error| {
        DecisionParseError::InvalidField { field: "agent_config", message: error.to_string() }
    })?;

    Ok(OrchestrationDecision { selected_agent, reasoning, agent_config, fallback_used: false })
}

/// Keyword routing over a model response that failed to parse as JSON.
/// Categories are checked in fixed priority order; the first matching set
/// wins and Hint is the terminal default.
pub fn route_from_response_text(response_text: &str) -> AgentKind {
    let lowered = response_text.to_lowercase();
    let categories: [(&[&str], AgentKind); 6] = [
        (&["hint", "stuck", "guidance"], AgentKind::Hint),
        (&["optimize", "improve", "better"], AgentKind::Optimize),
        (&["complexity", "performance", "time", "space"], AgentKind::Complexity),
        (&["solution", "explain", "how"], AgentKind::Solution),
        (&["question", "interview", "counter"], AgentKind::Counter),
        (&["deep", "advanced", "technical"], AgentKind::DeepQ),
    ];

    first_matching_category(&lowered, &categories)
}

/// Ultimate keyword routing over the raw user request, used when the routing
/// call itself failed and no model text is available.
pub fn route_from_request_text(user_request: &str) -> AgentKind {
    let lowered = user_request.to_lowercase();
    let categories: [(&[&str], AgentKind); 5] = [
        (&["hint", "help", "stuck", "guide"], AgentKind::Hint),
        (&["optimize", "improve", "better", "faster"], AgentKind::Optimize),
        (&["complexity", "time", "space", "performance"], AgentKind::Complexity),
        (&["solution", "solve", "answer", "explain"], AgentKind::Solution),
        (&["question", "interview", "ask"], AgentKind::Counter),
    ];

    first_matching_category(&lowered, &categories)
}

fn first_matching_category(lowered: &str, categories: &[(&[&str], AgentKind)]) -> AgentKind {
    categories
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(_, kind)| *kind)
        .unwrap_or(AgentKind::Hint)
}

/// Synthesize a decision from prose routing output (parse fallback).
pub fn decision_from_prose(response_text: &str) -> OrchestrationDecision {
    OrchestrationDecision {
        selected_agent: route_from_response_text(response_text),
        reasoning: response_text.to_string(),
        agent_config: AgentConfiguration {
            specific_focus: "General assistance".to_string(),
            difficulty_level: "medium".to_string(),
            context_awareness: "Basic context".to_string(),
            dynamic_parameters: Default::default(),
        },
        fallback_used: true,
    }
}

/// Synthesize a decision from the raw user request (ultimate fallback).
pub fn decision_from_request(user_request: &str) -> OrchestrationDecision {
    OrchestrationDecision {
        selected_agent: route_from_request_text(user_request),
        reasoning: format!(
            "Fallback selection based on keywords in request: `{user_request}`"
        ),
        agent_config: AgentConfiguration {
            specific_focus: "User request analysis".to_string(),
            difficulty_level: "medium".to_string(),
            context_awareness: "Limited context".to_string(),
            dynamic_parameters: Default::default(),
        },
        fallback_used: true,
    }
}
