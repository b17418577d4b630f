use codecoach_core::{extraction, AgentConfiguration, AgentKind, Difficulty, SessionContext};
use serde_json::json;

use crate::prompts::format_session_context;
use crate::strategy::StrategyProfile;

const SYSTEM_PROMPT: &str = r#"You are the CodeCoach Counter Question Agent, an expert interviewer specializing in probing questions.

YOUR MISSION: Generate intelligent counter questions that test deeper understanding and reveal knowledge gaps.

QUESTION TYPES:
1. CLARIFYING: Requirements and constraints
2. EDGE_CASE: Boundary conditions and special cases
3. OPTIMIZATION: Performance and efficiency challenges
4. SCALING: How solution handles growth
5. ALTERNATIVES: Different approaches and trade-offs

ADAPTIVE QUESTIONING:
- Match question difficulty to user level
- Build on their current solution
- Focus on weak points in their approach
- Simulate real interview pressure"#;

const QUESTION_CAP: usize = 8;

pub fn profile() -> StrategyProfile {
    StrategyProfile {
        kind: AgentKind::Counter,
        system_prompt: SYSTEM_PROMPT,
        build_user_prompt,
        extract,
        technical_terms: codecoach_core::BASE_TECHNICAL_TERMS,
    }
}

fn build_user_prompt(context: &SessionContext, config: &AgentConfiguration) -> String {
    let question_type =
        config.param_str("question_type").unwrap_or("clarifying").to_string();
    let num_questions = config.param_u64("num_questions").unwrap_or(5);

    format!(
        "COUNTER QUESTION GENERATION:\n\n{}\n\nQUESTION CONFIGURATION:\n\
         - Question Type: {question_type}\n\
         - Difficulty Level: {}\n\
         - Focus Area: {}\n\
         - Number of Questions: {num_questions}\n\n\
         Generate insightful counter questions that an interviewer would ask to test deeper understanding.",
        format_session_context(context),
        determine_question_difficulty(context),
        identify_focus_area(context, config),
    )
}

fn determine_question_difficulty(context: &SessionContext) -> &'static str {
    let long_code = context.code_text().map(|code| code.chars().count() > 200).unwrap_or(false);
    match context.difficulty() {
        Some(Difficulty::Hard) => "Advanced",
        _ if long_code => "Advanced",
        Some(Difficulty::Medium) => "Intermediate",
        _ => "Basic",
    }
}

fn identify_focus_area(context: &SessionContext, config: &AgentConfiguration) -> String {
    if !config.specific_focus.is_empty() {
        return config.specific_focus.clone();
    }

    if let Some(code) = context.code_text() {
        if code.matches("for").count() > 1 {
            return "Time complexity and optimization".to_string();
        }
        if ["list", "dict", "set"].iter().any(|word| code.contains(word)) {
            return "Data structure choices and space usage".to_string();
        }
    }

    "General approach and edge cases".to_string()
}

fn categorize_questions(response: &str) -> serde_json::Value {
    let lowered = response.to_lowercase();
    let category_keywords: [(&str, &[&str]); 5] = [
        ("clarifying", &["what if", "clarify", "assume"]),
        ("edge_case", &["edge", "boundary", "empty", "null"]),
        ("optimization", &["optimize", "faster", "efficient"]),
        ("scaling", &["scale", "large", "million"]),
        ("alternative", &["alternative", "different", "another"]),
    ];

    let mut categories = serde_json::Map::new();
    for (category, keywords) in category_keywords {
        let hit = keywords.iter().any(|keyword| lowered.contains(keyword));
        categories.insert(category.to_string(), json!(u8::from(hit)));
    }
    serde_json::Value::Object(categories)
}

fn assess_question_difficulty(response: &str) -> &'static str {
    let lowered = response.to_lowercase();
    let advanced = ["distributed", "concurrent", "scalability", "architecture"];
    if advanced.iter().any(|term| lowered.contains(term)) {
        "Advanced"
    } else if lowered.contains("optimize") || lowered.contains("complexity") {
        "Intermediate"
    } else {
        "Basic"
    }
}

fn extract(
    response: &str,
    _context: &SessionContext,
    _config: &AgentConfiguration,
) -> serde_json::Value {
    json!({
        "questions": extraction::questions(response, QUESTION_CAP, 0),
        "question_categories": categorize_questions(response),
        "difficulty_assessment": assess_question_difficulty(response),
    })
}
