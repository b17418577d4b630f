use codecoach_core::{extraction, AgentConfiguration, AgentKind, Difficulty, SessionContext};
use serde_json::json;

use crate::prompts::format_session_context;
use crate::strategy::StrategyProfile;

const SYSTEM_PROMPT: &str = r#"You are the CodeCoach Deep Question Agent, an expert in advanced technical exploration.

YOUR MISSION: Generate profound questions that push the boundaries of understanding and explore advanced concepts.

QUESTION DOMAINS:
1. SYSTEM DESIGN: How would this scale in production?
2. ARCHITECTURE: What are the design trade-offs?
3. PERFORMANCE: How does this perform under stress?
4. RELIABILITY: What failure modes exist?
5. OPTIMIZATION: What advanced techniques apply?
6. THEORY: What are the theoretical foundations?

Generate questions that separate senior engineers from junior ones."#;

const QUESTION_CAP: usize = 6;
const MIN_QUESTION_CHARS: usize = 30;

const COMPLEXITY_TERMS: &[&str] = &[
    "distributed systems",
    "consensus",
    "cap theorem",
    "eventual consistency",
    "load balancing",
    "sharding",
    "replication",
    "microservices",
    "containerization",
    "orchestration",
    "circuit breaker",
];

const CONNECTION_INDICATORS: &[&str] = &[
    "real world",
    "production",
    "industry",
    "practice",
    "application",
    "implementation",
    "deployment",
];

pub fn profile() -> StrategyProfile {
    StrategyProfile {
        kind: AgentKind::DeepQ,
        system_prompt: SYSTEM_PROMPT,
        build_user_prompt,
        extract,
        technical_terms: codecoach_core::BASE_TECHNICAL_TERMS,
    }
}

fn build_user_prompt(context: &SessionContext, config: &AgentConfiguration) -> String {
    let difficulty = config.param_str("difficulty_level").unwrap_or("medium").to_string();

    format!(
        "DEEP QUESTION GENERATION:\n\n{}\n\nDEEP ANALYSIS CONFIGURATION:\n\
         - Depth Level: {}\n\
         - Focus Domain: {}\n\
         - Technical Level: {}\n\
         - Difficulty: {difficulty}\n\n\
         Generate deep, thought-provoking questions that explore advanced concepts and real-world implications.",
        format_session_context(context),
        determine_depth_level(context, config),
        identify_focus_domain(context, config),
        assess_technical_level(context),
    )
}

fn determine_depth_level(context: &SessionContext, config: &AgentConfiguration) -> &'static str {
    let configured = config.param_str("difficulty_level").unwrap_or("medium");
    if configured == "hard" || context.difficulty() == Some(Difficulty::Hard) {
        "Architectural and Research level"
    } else if configured == "medium" {
        "Practical and Conceptual level"
    } else {
        "Conceptual level"
    }
}

fn identify_focus_domain(context: &SessionContext, config: &AgentConfiguration) -> String {
    if let Some(focus_area) = config.param_str("focus_area") {
        return focus_area.to_string();
    }

    let tags: Vec<&str> = context
        .problem
        .as_ref()
        .map(|problem| problem.tags.iter().map(String::as_str).collect())
        .unwrap_or_default();

    if tags.iter().any(|tag| ["graph", "tree"].contains(tag)) {
        "System Design and Graph Theory".to_string()
    } else if tags.iter().any(|tag| ["dynamic-programming", "recursion"].contains(tag)) {
        "Algorithmic Theory and Optimization".to_string()
    } else if tags.iter().any(|tag| ["array", "string"].contains(tag)) {
        "Performance and Memory Architecture".to_string()
    } else {
        "General System Architecture".to_string()
    }
}

fn assess_technical_level(context: &SessionContext) -> &'static str {
    let mut advanced_indicators = 0;

    if context.user_history.len() > 20 {
        advanced_indicators += 1;
    }

    if let Some(code) = context.code_text() {
        if ["class", "import", "try", "except"].iter().any(|term| code.contains(term)) {
            advanced_indicators += 1;
        }
        if code.chars().count() > 300 {
            advanced_indicators += 1;
        }
    }

    match advanced_indicators {
        count if count >= 2 => "Senior/Principal Engineer",
        1 => "Mid-level Engineer",
        _ => "Junior Engineer",
    }
}

fn categorize_domains(response: &str) -> serde_json::Value {
    let lowered = response.to_lowercase();
    let domain_keywords: [(&str, &[&str]); 6] = [
        ("system_design", &["system", "design", "distributed", "microservices"]),
        ("performance", &["performance", "optimize", "bottleneck", "latency"]),
        ("architecture", &["architecture", "pattern", "structure", "design"]),
        ("scalability", &["scale", "scalability", "load", "concurrent"]),
        ("theory", &["complexity", "algorithm", "theoretical", "mathematical"]),
        ("reliability", &["failure", "reliability", "fault", "resilience"]),
    ];

    let mut domains = serde_json::Map::new();
    for (domain, keywords) in domain_keywords {
        let hit = keywords.iter().any(|keyword| lowered.contains(keyword));
        domains.insert(domain.to_string(), json!(u8::from(hit)));
    }
    serde_json::Value::Object(domains)
}

fn assess_complexity(response: &str) -> &'static str {
    let lowered = response.to_lowercase();
    let advanced_count =
        COMPLEXITY_TERMS.iter().filter(|term| lowered.contains(*term)).count();

    match advanced_count {
        count if count >= 3 => "Very High",
        2 => "High",
        1 => "Medium",
        _ => "Low",
    }
}

fn extract(
    response: &str,
    _context: &SessionContext,
    _config: &AgentConfiguration,
) -> serde_json::Value {
    json!({
        "deep_questions": extraction::questions(response, QUESTION_CAP, MIN_QUESTION_CHARS),
        "question_domains": categorize_domains(response),
        "complexity_level": assess_complexity(response),
        "real_world_connections":
            extraction::sentences_containing(response, CONNECTION_INDICATORS, 3),
    })
}

#[cfg(test)]
mod tests {
    use codecoach_core::{AgentConfiguration, ProblemInfo, SessionContext};
    use serde_json::json;

    use super::{build_user_prompt, extract};

    #[test]
    fn graph_tags_steer_the_focus_domain() {
        let context = SessionContext {
            problem: Some(ProblemInfo {
                title: "Course Schedule".to_string(),
                tags: vec!["graph".to_string()],
                ..ProblemInfo::default()
            }),
            ..SessionContext::default()
        };
        let prompt = build_user_prompt(&context, &AgentConfiguration::default());
        assert!(prompt.contains("System Design and Graph Theory"));
        assert!(prompt.contains("Technical Level: Junior Engineer"));
    }

    #[test]
    fn configured_difficulty_raises_the_depth_level() {
        let config: AgentConfiguration = serde_json::from_value(json!({
            "dynamic_parameters": { "difficulty_level": "hard" }
        }))
        .expect("config");
        let prompt = build_user_prompt(&SessionContext::default(), &config);
        assert!(prompt.contains("Architectural and Research level"));
        assert!(prompt.contains("Difficulty: hard"));
    }

    #[test]
    fn extract_keeps_only_substantial_questions() {
        let response = "1. Why?\n\
            2. How would this algorithm behave across a sharding boundary in production?\n\
            In practice the index would live behind load balancing.";
        let data = extract(response, &SessionContext::default(), &AgentConfiguration::default());

        let questions = data["deep_questions"].as_array().unwrap();
        assert_eq!(questions.len(), 1);
        assert!(questions[0].as_str().unwrap().contains("sharding boundary"));
        assert_eq!(data["question_domains"]["scalability"], 1);
        assert_eq!(data["complexity_level"], "High");
        assert!(!data["real_world_connections"].as_array().unwrap().is_empty());
    }
}
