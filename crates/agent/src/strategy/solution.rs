use codecoach_core::{extraction, AgentConfiguration, AgentKind, Difficulty, SessionContext};
use serde_json::json;

use crate::prompts::format_session_context;
use crate::strategy::StrategyProfile;

const SYSTEM_PROMPT: &str = r#"You are the CodeCoach Solution Agent, an expert educator specializing in comprehensive solution explanations.

YOUR MISSION: Provide complete, educational solution explanations that build deep understanding.

EXPLANATION PHILOSOPHY:
- Start with problem understanding and intuition
- Present multiple approaches when relevant
- Explain the thinking process, not just the solution
- Build from simple to complex approaches

SOLUTION STRUCTURE:
1. Problem analysis and key insights
2. Approach explanation with intuition
3. Step-by-step algorithm breakdown
4. Complete code implementation
5. Complexity analysis
6. Alternative approaches comparison
7. Edge cases and considerations"#;

const PATTERN_CATALOG: &[&str] =
    &["two pointer", "sliding window", "dynamic programming", "greedy", "divide and conquer"];

pub fn profile() -> StrategyProfile {
    StrategyProfile {
        kind: AgentKind::Solution,
        system_prompt: SYSTEM_PROMPT,
        build_user_prompt,
        extract,
        technical_terms: codecoach_core::BASE_TECHNICAL_TERMS,
    }
}

fn build_user_prompt(context: &SessionContext, config: &AgentConfiguration) -> String {
    format!(
        "SOLUTION EXPLANATION REQUEST:\n\n{}\n\nEXPLANATION CONFIGURATION:\n\
         - Solution Depth: {}\n\
         - Explanation Style: {}\n\
         - Include Multiple Approaches: {}\n\
         - Focus on Optimal: {}\n\n\
         Provide comprehensive solution explanation with educational focus.",
        format_session_context(context),
        determine_solution_depth(context),
        determine_explanation_style(context),
        config.param_bool("include_multiple_approaches").unwrap_or(true),
        config.param_bool("include_optimal_solution").unwrap_or(true),
    )
}

fn determine_solution_depth(context: &SessionContext) -> &'static str {
    let working = context.user_code.as_ref().is_some_and(|code| code.is_working)
        && context.has_code();
    if working {
        "Optimization and alternative approaches"
    } else if context.difficulty() == Some(Difficulty::Hard) {
        "Deep explanation with multiple approaches"
    } else {
        "Complete solution with step-by-step breakdown"
    }
}

fn determine_explanation_style(context: &SessionContext) -> &'static str {
    let history = context.user_history.len();
    if history > 15 {
        "Advanced with focus on patterns"
    } else if history > 5 {
        "Intermediate with detailed reasoning"
    } else {
        "Beginner-friendly with examples"
    }
}

fn extract(
    response: &str,
    _context: &SessionContext,
    _config: &AgentConfiguration,
) -> serde_json::Value {
    let mut complexity_info = serde_json::Map::new();
    if let Some(time) = extraction::time_complexity_mention(response) {
        complexity_info.insert("time".to_string(), json!(time));
    }
    if let Some(space) = extraction::space_complexity_mention(response) {
        complexity_info.insert("space".to_string(), json!(space));
    }

    json!({
        "solution_code": extraction::longest_code_block(response).unwrap_or_default(),
        "approaches": extraction::approach_headers(response),
        "key_insights": extraction::list_items(response, &["insight", "key", "important", "notice"]),
        "complexity_info": complexity_info,
        "patterns": extraction::terms_present(response, PATTERN_CATALOG, 3),
    })
}
