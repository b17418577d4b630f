use codecoach_core::{extraction, AgentConfiguration, AgentKind, Difficulty, SessionContext};
use serde_json::json;

use crate::prompts::format_session_context;
use crate::strategy::StrategyProfile;

const SYSTEM_PROMPT: &str = r#"You are the CodeCoach Complexity Agent, an expert in algorithmic complexity analysis.

YOUR MISSION: Provide detailed, educational complexity analysis that helps users understand performance characteristics.

ANALYSIS APPROACH:
- Examine code step by step
- Identify all operations and their costs
- Explain reasoning behind complexity calculations
- Discuss best/average/worst cases when relevant
- Compare with alternative approaches

RESPONSE STRUCTURE:
1. Code walkthrough and operation identification
2. Time complexity analysis with explanation
3. Space complexity analysis with explanation
4. Complexity breakdown by code sections
5. Comparison with optimal solutions
6. Performance implications and recommendations"#;

pub fn profile() -> StrategyProfile {
    StrategyProfile {
        kind: AgentKind::Complexity,
        system_prompt: SYSTEM_PROMPT,
        build_user_prompt,
        extract,
        technical_terms: codecoach_core::BASE_TECHNICAL_TERMS,
    }
}

fn build_user_prompt(context: &SessionContext, config: &AgentConfiguration) -> String {
    format!(
        "COMPLEXITY ANALYSIS REQUEST:\n\n{}\n\nANALYSIS CONFIGURATION:\n\
         - Analysis Depth: {}\n\
         - Focus Areas: {}\n\
         - Educational Level: {}\n\n\
         Provide detailed complexity analysis with step-by-step reasoning.",
        format_session_context(context),
        determine_analysis_depth(context),
        identify_complexity_focus(context, config),
        assess_user_level(context),
    )
}

fn determine_analysis_depth(context: &SessionContext) -> &'static str {
    let code_len = context.code_text().map(|code| code.chars().count()).unwrap_or(0);
    if code_len < 50 {
        "Basic analysis with educational focus"
    } else if context.difficulty() == Some(Difficulty::Hard) {
        "Deep analysis with multiple scenarios"
    } else {
        "Comprehensive analysis with optimization suggestions"
    }
}

fn identify_complexity_focus(context: &SessionContext, config: &AgentConfiguration) -> String {
    if !config.specific_focus.is_empty() {
        return config.specific_focus.clone();
    }

    let code = context.code_text().unwrap_or("");
    if code.matches("for").count() > 1 {
        "Time complexity (nested loops detected)".to_string()
    } else if ["list", "dict", "set"].iter().any(|word| code.contains(word)) {
        "Space complexity (data structures usage)".to_string()
    } else {
        "Both time and space complexity".to_string()
    }
}

fn assess_user_level(context: &SessionContext) -> &'static str {
    let complexity_requests = context
        .user_history
        .iter()
        .filter(|entry| entry.kind == "complexity")
        .count();

    if complexity_requests > 3 {
        "Advanced"
    } else if complexity_requests > 1 {
        "Intermediate"
    } else {
        "Beginner"
    }
}

fn extract(
    response: &str,
    _context: &SessionContext,
    _config: &AgentConfiguration,
) -> serde_json::Value {
    let lowered = response.to_lowercase();
    let mut breakdown = serde_json::Map::new();
    if lowered.contains("loop") {
        breakdown.insert("loops".to_string(), json!("Loop complexity analysis provided"));
    }
    if lowered.contains("recursive") {
        breakdown.insert("recursion".to_string(), json!("Recursion complexity analysis provided"));
    }

    json!({
        "time_complexity": extraction::time_complexity_phrase(response)
            .unwrap_or_else(|| "Not specified".to_string()),
        "space_complexity": extraction::space_complexity_phrase(response)
            .unwrap_or_else(|| "Not specified".to_string()),
        "complexity_breakdown": breakdown,
        "optimization_suggestions":
            extraction::list_items(response, &["optimize", "improve", "better"]),
    })
}
