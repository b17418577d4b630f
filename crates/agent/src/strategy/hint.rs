use codecoach_core::{extraction, AgentConfiguration, AgentKind, Difficulty, SessionContext};
use serde_json::json;

use crate::prompts::format_session_context;
use crate::strategy::StrategyProfile;

const SYSTEM_PROMPT: &str = r#"You are the CodeCoach Hint Agent, an intelligent coding mentor.

YOUR MISSION: Guide users to discover solutions through strategic hints.

HINT PHILOSOPHY:
- Never give away the solution directly
- Build understanding through progressive revelation
- Adapt to user's current level and context
- Focus on teaching problem-solving patterns

HINT LEVELS:
1. NUDGE: Subtle direction
2. PATTERN: Point toward technique
3. APPROACH: Suggest algorithm
4. STRUCTURE: Provide pseudocode guidance
5. DETAILED: Implementation guidance (only when very stuck)

RESPONSE STRUCTURE:
1. Acknowledge their situation
2. Provide level-appropriate hint
3. Explain why this helps
4. Suggest next steps
5. Encourage them"#;

const KEY_CONCEPTS: &[&str] =
    &["hash map", "two pointer", "sliding window", "binary search", "recursion"];

pub fn profile() -> StrategyProfile {
    StrategyProfile {
        kind: AgentKind::Hint,
        system_prompt: SYSTEM_PROMPT,
        build_user_prompt,
        extract,
        technical_terms: codecoach_core::BASE_TECHNICAL_TERMS,
    }
}

fn build_user_prompt(context: &SessionContext, config: &AgentConfiguration) -> String {
    let hint_level = determine_hint_level(context);
    let stuck_point = analyze_stuck_point(context);
    let user_level = assess_user_level(context);
    let focus = if config.specific_focus.is_empty() {
        "General guidance"
    } else {
        &config.specific_focus
    };

    format!(
        "HINT REQUEST:\n\n{}\n\nANALYSIS:\n\
         - Optimal Hint Level: {hint_level}/5\n\
         - User Level: {user_level}\n\
         - Stuck Point: {stuck_point}\n\
         - Focus: {focus}\n\n\
         Provide a Level {hint_level} hint that helps them discover the solution without giving it away.",
        format_session_context(context)
    )
}

/// Base 3, adjusted by code state, time on problem, and difficulty, then
/// clamped to 1..=5.
pub fn determine_hint_level(context: &SessionContext) -> u8 {
    let mut level: i8 = match context.code_text() {
        None => 2,
        Some(_) if !context.user_code.as_ref().is_some_and(|code| code.is_working) => 4,
        Some(_) => 3,
    };

    if context.time_spent_minutes() > 30 {
        level += 1;
    }

    match context.difficulty() {
        Some(Difficulty::Hard) => level += 1,
        Some(Difficulty::Easy) => level -= 1,
        _ => {}
    }

    level.clamp(1, 5) as u8
}

fn analyze_stuck_point(context: &SessionContext) -> &'static str {
    let Some(code) = context.code_text() else {
        return "Getting started";
    };

    let working = context.user_code.as_ref().is_some_and(|user_code| user_code.is_working);
    if code.contains("def ") && code.lines().count() < 3 {
        "Function structure but no implementation"
    } else if code.contains("for ") && !code.contains("if ") {
        "Loop without logic"
    } else if code.chars().count() > 200 && !working {
        "Complex code not working"
    } else {
        "General implementation"
    }
}

fn assess_user_level(context: &SessionContext) -> &'static str {
    let code = context.code_text().unwrap_or("");

    let mut quality_score = 0;
    if code.contains("def ") {
        quality_score += 1;
    }
    if ["try:", "enumerate", "zip"].iter().any(|token| code.contains(token)) {
        quality_score += 1;
    }
    if code.contains('#') {
        quality_score += 1;
    }

    match quality_score {
        score if score >= 2 => "Intermediate",
        1 => "Beginner-Intermediate",
        _ => "Beginner",
    }
}

fn extract(
    response: &str,
    context: &SessionContext,
    _config: &AgentConfiguration,
) -> serde_json::Value {
    // If the response does not state its level, assume it honored the one we
    // asked for.
    let requested_level = determine_hint_level(context);
    json!({
        "hint_text": response,
        "hint_level": extraction::hint_level(response, requested_level),
        "key_concepts": extraction::terms_present(response, KEY_CONCEPTS, 3),
        "next_steps": extraction::list_items(response, &["next", "try", "consider"]),
    })
}
