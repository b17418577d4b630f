use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::response::AgentKind;

/// Agent configuration produced by the orchestration engine. Never mutated
/// after creation; unknown `dynamic_parameters` keys are carried through
/// untouched so each strategy can pick out its own knobs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfiguration {
    pub specific_focus: String,
    pub difficulty_level: String,
    pub context_awareness: String,
    pub dynamic_parameters: BTreeMap<String, serde_json::Value>,
}

impl AgentConfiguration {
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.dynamic_parameters.get(key).and_then(|value| value.as_str())
    }

    pub fn param_u64(&self, key: &str) -> Option<u64> {
        self.dynamic_parameters.get(key).and_then(|value| value.as_u64())
    }

    pub fn param_f64(&self, key: &str) -> Option<f64> {
        self.dynamic_parameters.get(key).and_then(|value| value.as_f64())
    }

    pub fn param_bool(&self, key: &str) -> Option<bool> {
        self.dynamic_parameters.get(key).and_then(|value| value.as_bool())
    }

    pub fn param_str_list(&self, key: &str) -> Vec<String> {
        self.dynamic_parameters
            .get(key)
            .and_then(|value| value.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Routing outcome for one request. Invariant: `selected_agent` is always a
/// member of the closed six-value set; when routing output cannot establish
/// that, a deterministic fallback decision is synthesized instead.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrchestrationDecision {
    pub selected_agent: AgentKind,
    pub reasoning: String,
    pub agent_config: AgentConfiguration,
    pub fallback_used: bool,
}
