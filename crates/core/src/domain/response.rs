use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of agent strategies. Routing must always resolve to one of
/// these six values; unknown labels are a parse failure, never a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Hint,
    Optimize,
    Complexity,
    Solution,
    Counter,
    DeepQ,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown agent label `{0}`")]
pub struct UnknownAgentLabel(pub String);

impl AgentKind {
    pub const ALL: [AgentKind; 6] = [
        AgentKind::Hint,
        AgentKind::Optimize,
        AgentKind::Complexity,
        AgentKind::Solution,
        AgentKind::Counter,
        AgentKind::DeepQ,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hint => "hint",
            Self::Optimize => "optimize",
            Self::Complexity => "complexity",
            Self::Solution => "solution",
            Self::Counter => "counter",
            Self::DeepQ => "deepq",
        }
    }

    /// Uppercase label used in orchestration prompts and routing JSON.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hint => "HINT",
            Self::Optimize => "OPTIMIZE",
            Self::Complexity => "COMPLEXITY",
            Self::Solution => "SOLUTION",
            Self::Counter => "COUNTER",
            Self::DeepQ => "DEEPQ",
        }
    }

    /// Parse a routing label case-insensitively.
    pub fn from_label(value: &str) -> Result<Self, UnknownAgentLabel> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HINT" => Ok(Self::Hint),
            "OPTIMIZE" => Ok(Self::Optimize),
            "COMPLEXITY" => Ok(Self::Complexity),
            "SOLUTION" => Ok(Self::Solution),
            "COUNTER" => Ok(Self::Counter),
            "DEEPQ" => Ok(Self::DeepQ),
            _ => Err(UnknownAgentLabel(value.to_string())),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// The externally observable result of one request. Assembled once; callers
/// may append metadata keys but must not alter `response_text` or
/// `confidence_score` after assembly.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgentResponse {
    pub agent_kind: AgentKind,
    pub success: bool,
    pub response_text: String,
    pub confidence_score: f64,
    pub processing_time_ms: u64,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl AgentResponse {
    pub fn success(
        agent_kind: AgentKind,
        response_text: impl Into<String>,
        confidence_score: f64,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            agent_kind,
            success: true,
            response_text: response_text.into(),
            confidence_score: confidence_score.clamp(0.0, 1.0),
            processing_time_ms,
            metadata: BTreeMap::new(),
        }
    }

    /// A structurally valid degraded response: zero confidence, `success=false`.
    pub fn failure(
        agent_kind: AgentKind,
        response_text: impl Into<String>,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            agent_kind,
            success: false,
            response_text: response_text.into(),
            confidence_score: 0.0,
            processing_time_ms,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn append_metadata(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.metadata.insert(key.into(), value);
    }
}
