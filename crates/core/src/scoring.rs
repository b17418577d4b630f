//! Deterministic confidence scoring for agent responses.
//!
//! The score is a pure function of the response text, the session context and
//! the agent configuration. Same inputs, same score, no model calls.

use crate::domain::context::SessionContext;
use crate::domain::decision::AgentConfiguration;

/// Baseline vocabulary shared by every strategy. Strategies that care about a
/// narrower vocabulary construct a [`ConfidenceScorer`] over their own list.
pub const BASE_TECHNICAL_TERMS: &[&str] = &[
    "algorithm",
    "complexity",
    "optimization",
    "data structure",
    "time",
    "space",
    "efficient",
    "performance",
    "solution",
];

/// Scores one response against the context it was produced for.
///
/// Additive components, each bounded:
/// - 0.30 base for any successful response
/// - 0.20 for responses over 200 chars, 0.10 over 100
/// - 0.10 when the problem title is echoed in the response
/// - 0.10 when the user's code language is mentioned (only if code exists)
/// - 0.15 when any word of the configured focus appears
/// - 0.05 per technical term found, capped at 0.15
///
/// The sum is capped at 1.0.
#[derive(Clone, Debug)]
pub struct ConfidenceScorer {
    technical_terms: Vec<String>,
}

impl ConfidenceScorer {
    pub fn new(technical_terms: &[&str]) -> Self {
        Self { technical_terms: technical_terms.iter().map(|term| term.to_lowercase()).collect() }
    }

    pub fn score(
        &self,
        response: &str,
        context: &SessionContext,
        config: &AgentConfiguration,
    ) -> f64 {
        let lowered = response.to_lowercase();
        let mut score = 0.3;

        let length = response.chars().count();
        if length > 200 {
            score += 0.2;
        } else if length > 100 {
            score += 0.1;
        }

        if let Some(title) = context.problem_title() {
            if lowered.contains(&title.to_lowercase()) {
                score += 0.1;
            }
        }

        if let Some(language) = context.code_language() {
            if lowered.contains(&language.to_lowercase()) {
                score += 0.1;
            }
        }

        let focus = config.specific_focus.to_lowercase();
        if !focus.is_empty() && focus.split_whitespace().any(|word| lowered.contains(word)) {
            score += 0.15;
        }

        let terms_found = self
            .technical_terms
            .iter()
            .filter(|term| lowered.contains(term.as_str()))
            .count();
        score += (terms_found as f64 * 0.05).min(0.15);

        score.min(1.0)
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new(BASE_TECHNICAL_TERMS)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfidenceScorer, BASE_TECHNICAL_TERMS};
    use crate::domain::context::{ProblemInfo, SessionContext, UserCode};
    use crate::domain::decision::AgentConfiguration;

    fn context_with_title_and_code() -> SessionContext {
        SessionContext {
            problem: Some(ProblemInfo { title: "Two Sum".to_string(), ..ProblemInfo::default() }),
            user_code: Some(UserCode {
                code: "def two_sum(nums): pass".to_string(),
                language: "python".to_string(),
                is_working: false,
            }),
            ..SessionContext::default()
        }
    }

    #[test]
    fn bare_short_response_scores_only_the_base() {
        let scorer = ConfidenceScorer::default();
        let score =
            scorer.score("ok", &SessionContext::default(), &AgentConfiguration::default());
        assert!((score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn each_component_adds_its_bonus() {
        let scorer = ConfidenceScorer::default();
        let context = context_with_title_and_code();
        let config = AgentConfiguration {
            specific_focus: "hash map lookup".to_string(),
            ..AgentConfiguration::default()
        };

        // > 100 chars, title echo, language mention, focus word, one term.
        let response = "For Two Sum in Python, a hash map gives an efficient single pass; \
                        store each value's index and look up the complement as you go.";
        let score = scorer.score(response, &context, &config);
        assert!((score - (0.3 + 0.1 + 0.1 + 0.1 + 0.15 + 0.05)).abs() < 1e-9);
    }

    #[test]
    fn technical_term_bonus_is_capped() {
        let scorer = ConfidenceScorer::default();
        let response = "algorithm complexity optimization performance solution";
        let score =
            scorer.score(response, &SessionContext::default(), &AgentConfiguration::default());
        // Five terms found but the term bonus caps at 0.15.
        assert!((score - (0.3 + 0.15)).abs() < 1e-9);
    }

    #[test]
    fn longer_responses_never_score_lower_at_the_length_tiers() {
        let scorer = ConfidenceScorer::default();
        let context = SessionContext::default();
        let config = AgentConfiguration::default();

        let short = scorer.score(&"x".repeat(80), &context, &config);
        let medium = scorer.score(&"x".repeat(150), &context, &config);
        let long = scorer.score(&"x".repeat(250), &context, &config);
        assert!(short < medium && medium < long);
    }

    #[test]
    fn score_is_capped_at_one() {
        let scorer = ConfidenceScorer::new(BASE_TECHNICAL_TERMS);
        let context = context_with_title_and_code();
        let config = AgentConfiguration {
            specific_focus: "efficient time complexity".to_string(),
            ..AgentConfiguration::default()
        };
        let response = format!(
            "Two Sum in python: an efficient algorithm with linear time complexity, better \
             space usage, strong performance and a clean solution. {}",
            "padding ".repeat(40)
        );

        let score = scorer.score(&response, &context, &config);
        assert!(score <= 1.0);
    }

    #[test]
    fn language_bonus_requires_actual_code() {
        let scorer = ConfidenceScorer::default();
        let context = SessionContext {
            user_code: Some(UserCode {
                code: "  ".to_string(),
                language: "python".to_string(),
                is_working: false,
            }),
            ..SessionContext::default()
        };

        let score = scorer.score("python", &context, &AgentConfiguration::default());
        assert!((score - 0.3).abs() < 1e-9);
    }
}
