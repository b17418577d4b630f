use codecoach_core::{extraction, AgentConfiguration, AgentKind, Difficulty, SessionContext};
use serde_json::json;

use crate::prompts::format_session_context;
use crate::strategy::StrategyProfile;

const SYSTEM_PROMPT: &str = r#"You are the CodeCoach Optimization Agent, an expert in code improvement and performance optimization.

YOUR MISSION: Analyze user code and provide intelligent optimization suggestions that improve performance, readability, and maintainability.

OPTIMIZATION DIMENSIONS:
1. TIME COMPLEXITY: Reduce algorithmic complexity
2. SPACE COMPLEXITY: Minimize memory usage
3. READABILITY: Improve code clarity and structure
4. PERFORMANCE: Optimize for runtime efficiency
5. BEST PRACTICES: Apply language-specific optimizations

RESPONSE STRUCTURE:
1. Current code analysis
2. Identified optimization opportunities
3. Optimized code solution
4. Explanation of improvements
5. Complexity comparison (before/after)
6. Trade-offs and considerations"#;

const TECHNICAL_TERMS: &[&str] = &[
    "optimize",
    "efficiency",
    "complexity",
    "performance",
    "algorithm",
    "time",
    "space",
    "memory",
    "runtime",
    "bottleneck",
    "improve",
    "reduce",
    "eliminate",
    "faster",
    "better",
    "optimal",
];

const TECHNIQUE_CATALOG: &[&str] = &[
    "memoization",
    "dynamic programming",
    "hash map",
    "two pointer",
    "sliding window",
    "binary search",
    "greedy",
    "divide and conquer",
    "early termination",
    "caching",
    "preprocessing",
];

const APPLIED_TECHNIQUE_KEYWORDS: &[&str] = &[
    "hash map",
    "memoization",
    "two pointer",
    "sliding window",
    "binary search",
    "early termination",
    "space optimization",
];

pub fn profile() -> StrategyProfile {
    StrategyProfile {
        kind: AgentKind::Optimize,
        system_prompt: SYSTEM_PROMPT,
        build_user_prompt,
        extract,
        technical_terms: TECHNICAL_TERMS,
    }
}

fn build_user_prompt(context: &SessionContext, config: &AgentConfiguration) -> String {
    let focus = determine_optimization_focus(context, config);
    let quality = analyze_code_quality(context);
    let level = determine_optimization_level(context);
    let target = if config.specific_focus.is_empty() {
        "General optimization"
    } else {
        &config.specific_focus
    };

    format!(
        "CODE OPTIMIZATION REQUEST:\n\n{}\n\nOPTIMIZATION ANALYSIS:\n\
         - Primary Focus: {focus}\n\
         - Code Quality: {quality}\n\
         - Optimization Level: {level}\n\
         - Target Areas: {target}\n\n\
         OPTIMIZATION INSTRUCTIONS:\n\
         1. Analyze the current code for inefficiencies\n\
         2. Identify specific optimization opportunities\n\
         3. Provide optimized code with improvements\n\
         4. Explain each optimization made\n\
         5. Compare before/after complexity\n\
         6. Discuss any trade-offs\n\n\
         Focus on {focus} while maintaining code correctness and readability.",
        format_session_context(context)
    )
}

pub fn determine_optimization_focus(context: &SessionContext, config: &AgentConfiguration) -> String {
    let focus_areas = config.param_str_list("focus_areas");
    if !focus_areas.is_empty() {
        return focus_areas.join(", ");
    }

    let Some(code) = context.code_text() else {
        return "general optimization principles".to_string();
    };

    if code.matches("for").count() > 2 {
        "time complexity reduction (multiple nested loops detected)".to_string()
    } else if code.contains("while") && code.contains("for") {
        "algorithmic efficiency (mixed loop patterns)".to_string()
    } else if code.lines().count() > 20 {
        "code structure and readability".to_string()
    } else if context.difficulty() == Some(Difficulty::Hard) {
        "advanced algorithmic optimization".to_string()
    } else {
        "time and space complexity optimization".to_string()
    }
}

fn analyze_code_quality(context: &SessionContext) -> String {
    let Some(code) = context.code_text() else {
        return "No code to analyze".to_string();
    };

    let mut issues = Vec::new();
    if code.matches("for").count() >= 3 {
        issues.push("multiple nested loops");
    }
    if code.contains("list(") || code.contains("dict(") {
        issues.push("potential inefficient conversions");
    }
    if code.matches("append").count() > 5 {
        issues.push("frequent list operations");
    }
    if code.contains("sort()") && code.contains("for") {
        issues.push("sorting within loops");
    }

    if !issues.is_empty() {
        format!("Issues detected: {}", issues.join(", "))
    } else if context.user_code.as_ref().is_some_and(|user_code| user_code.is_working) {
        "Working code, ready for optimization".to_string()
    } else {
        "Code needs debugging before optimization".to_string()
    }
}

fn determine_optimization_level(context: &SessionContext) -> &'static str {
    let user_experience = context.user_history.len();
    match context.difficulty() {
        Some(Difficulty::Hard) => "Advanced (algorithmic + implementation optimizations)",
        _ if user_experience > 20 => "Advanced (algorithmic + implementation optimizations)",
        Some(Difficulty::Medium) => "Intermediate (efficiency + readability improvements)",
        _ if user_experience > 5 => "Intermediate (efficiency + readability improvements)",
        _ => "Basic (fundamental optimizations)",
    }
}

fn extract(
    response: &str,
    _context: &SessionContext,
    _config: &AgentConfiguration,
) -> serde_json::Value {
    let mut improvements =
        extraction::list_items(response, &["improved", "optimized", "reduced", "eliminated"]);
    let lowered = response.to_lowercase();
    for keyword in APPLIED_TECHNIQUE_KEYWORDS {
        if lowered.contains(keyword) {
            improvements.push(format!("Applied {keyword} technique"));
        }
    }
    improvements.truncate(5);

    let mut complexity_analysis = serde_json::Map::new();
    if let Some(time) = extraction::time_complexity_comparison(response) {
        complexity_analysis.insert("time_complexity".to_string(), json!(time));
    }
    if let Some(space) = extraction::space_complexity_comparison(response) {
        complexity_analysis.insert("space_complexity".to_string(), json!(space));
    }

    let trade_offs = extraction::sentence_containing(
        response,
        &["trade-off", "however", "but", "although", "while"],
    )
    .unwrap_or_else(|| "No significant trade-offs identified".to_string());

    json!({
        "optimized_code": extraction::longest_code_block(response).unwrap_or_default(),
        "improvements": improvements,
        "complexity_analysis": complexity_analysis,
        "trade_offs": trade_offs,
        "optimization_techniques": extraction::terms_present(response, TECHNIQUE_CATALOG, 5),
    })
}

#[cfg(test)]
mod tests {
    use codecoach_core::{AgentConfiguration, SessionContext, UserCode};
    use serde_json::json;

    use super::{build_user_prompt, determine_optimization_focus, extract};

    fn context_with_code(code: &str) -> SessionContext {
        SessionContext {
            user_code: Some(UserCode {
                code: code.to_string(),
                language: "python".to_string(),
                is_working: true,
            }),
            ..SessionContext::default()
        }
    }

    #[test]
    fn nested_loops_drive_the_focus() {
        let context = context_with_code(
            "for i in nums:\n    for j in nums:\n        for k in nums:\n            pass",
        );
        let focus = determine_optimization_focus(&context, &AgentConfiguration::default());
        assert!(focus.contains("multiple nested loops detected"));
    }

    #[test]
    fn configured_focus_areas_take_priority() {
        let config: AgentConfiguration = serde_json::from_value(json!({
            "dynamic_parameters": { "focus_areas": ["memory usage", "readability"] }
        }))
        .expect("config");
        let focus = determine_optimization_focus(&context_with_code("for x in y: pass"), &config);
        assert_eq!(focus, "memory usage, readability");
    }

    #[test]
    fn no_code_falls_back_to_general_principles() {
        let focus =
            determine_optimization_focus(&SessionContext::default(), &AgentConfiguration::default());
        assert_eq!(focus, "general optimization principles");
    }

    #[test]
    fn prompt_flags_sorting_inside_loops() {
        let prompt = build_user_prompt(
            &context_with_code("for x in nums:\n    nums.sort()\n"),
            &AgentConfiguration::default(),
        );
        assert!(prompt.contains("sorting within loops"));
    }

    #[test]
    fn extract_collects_code_techniques_and_trade_offs() {
        let response = "Optimized with a hash map.\n\
            ```python\nseen = {}\nfor i, n in enumerate(nums):\n    seen[n] = i\n```\n\
            1. Reduced the inner scan\n\
            Time complexity goes from O(n^2) to O(n). However, it uses extra memory.";
        let data = extract(response, &SessionContext::default(), &AgentConfiguration::default());

        assert!(data["optimized_code"].as_str().unwrap().starts_with("seen = {}"));
        assert_eq!(data["improvements"][0], "Reduced the inner scan");
        assert_eq!(data["improvements"][1], "Applied hash map technique");
        assert!(data["complexity_analysis"]["time_complexity"]
            .as_str()
            .unwrap()
            .contains("O(n^2)"));
        assert!(data["trade_offs"].as_str().unwrap().contains("However"));
        assert_eq!(data["optimization_techniques"][0], "hash map");
    }
}
