//! The closed strategy set. Each strategy is a static profile: a system
//! prompt, a prompt builder, a deterministic extractor, and its scoring
//! vocabulary. Strategies hold no state; the pipeline owns execution.

pub mod complexity;
pub mod counter;
pub mod deepq;
pub mod hint;
pub mod optimize;
pub mod solution;

use codecoach_core::{AgentConfiguration, AgentKind, SessionContext};

pub struct StrategyProfile {
    pub kind: AgentKind,
    pub system_prompt: &'static str,
    pub build_user_prompt: fn(&SessionContext, &AgentConfiguration) -> String,
    pub extract: fn(&str, &SessionContext, &AgentConfiguration) -> serde_json::Value,
    pub technical_terms: &'static [&'static str],
}

pub struct StrategyRegistry {
    profiles: Vec<StrategyProfile>,
}

impl StrategyRegistry {
    /// The standard six-strategy registry. Hint comes first: it doubles as
    /// the resolution fallback.
    pub fn standard() -> Self {
        Self {
            profiles: vec![
                hint::profile(),
                optimize::profile(),
                complexity::profile(),
                solution::profile(),
                counter::profile(),
                deepq::profile(),
            ],
        }
    }

    /// Always returns a profile; an unregistered kind resolves to the first
    /// profile (hint).
    pub fn resolve(&self, kind: AgentKind) -> &StrategyProfile {
        self.profiles
            .iter()
            .find(|profile| profile.kind == kind)
            .unwrap_or(&self.profiles[0])
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
