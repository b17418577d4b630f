//! Prompt assembly. Everything here is string formatting over the session
//! context; no model calls and no hidden state.

use codecoach_core::{AgentKind, SessionContext};

pub const CONTEXT_ANALYSIS_SYSTEM_PROMPT: &str =
    "You are an expert context analyzer for coding assistance.";

pub const ORCHESTRATOR_SYSTEM_PROMPT: &str = "You are the master orchestrator for an AI coding \
     assistant. Make precise, intelligent routing decisions.";

pub fn agent_context_system_prompt(kind: AgentKind) -> String {
    format!("You are a context analyzer for a {kind} agent.")
}

const DESCRIPTION_LIMIT: usize = 500;

/// Render the session context as the shared prompt block used by every
/// strategy. Sections with no data are omitted, except the code section
/// which always states when no code exists.
pub fn format_session_context(context: &SessionContext) -> String {
    let mut parts = Vec::new();

    if let Some(problem) = &context.problem {
        let description: String = problem.description.chars().take(DESCRIPTION_LIMIT).collect();
        parts.push(format!(
            "PROBLEM DETAILS:\n\
             - Title: {}\n\
             - Difficulty: {}\n\
             - Description: {}...\n\
             - Tags: {}\n",
            if problem.title.is_empty() { "Unknown" } else { &problem.title },
            problem.difficulty.map(|difficulty| difficulty.as_str()).unwrap_or("Unknown"),
            if description.is_empty() { "No description available" } else { &description },
            problem.tags.join(", "),
        ));
    }

    match context.code_text() {
        Some(code) => {
            let language = context.code_language().unwrap_or("unknown");
            let status = if context.user_code.as_ref().is_some_and(|user_code| user_code.is_working)
            {
                "Working"
            } else {
                "Not working/incomplete"
            };
            parts.push(format!(
                "USER'S CURRENT CODE ({language}):\n```{language}\n{code}\n```\nCode Status: {status}\n"
            ));
        }
        None => parts.push("USER'S CURRENT CODE: No code written yet".to_string()),
    }

    if let Some(page) = &context.page_context {
        parts.push(format!(
            "PAGE CONTEXT:\n\
             - Time on problem: {} minutes\n\
             - Attempts made: {}\n\
             - Current focus area: {}\n",
            page.time_spent_minutes,
            page.attempts,
            page.focus_area.as_deref().unwrap_or("unknown"),
        ));
    }

    if !context.user_history.is_empty() {
        let recent = context.recent_history(3);
        let rendered = serde_json::to_string_pretty(recent).unwrap_or_else(|_| "[]".to_string());
        parts.push(format!("RECENT USER HISTORY:\n{rendered}\n"));
    }

    parts.join("\n")
}

/// The master routing prompt. Lists every strategy with its trigger
/// conditions and demands a strict JSON decision.
pub fn orchestrator_prompt(user_request: &str, context: &SessionContext) -> String {
    let problem_info = context
        .problem
        .as_ref()
        .and_then(|problem| serde_json::to_string_pretty(problem).ok())
        .unwrap_or_else(|| "{}".to_string());
    let code_state = match &context.user_code {
        Some(user_code) if !user_code.code.trim().is_empty() => {
            serde_json::to_string_pretty(user_code).unwrap_or_else(|_| "{}".to_string())
        }
        _ => "No code written yet".to_string(),
    };
    let user_history = if context.user_history.is_empty() {
        "No history available".to_string()
    } else {
        serde_json::to_string_pretty(context.recent_history(5))
            .unwrap_or_else(|_| "[]".to_string())
    };
    let page_context = context
        .page_context
        .as_ref()
        .and_then(|page| serde_json::to_string_pretty(page).ok())
        .unwrap_or_else(|| "{}".to_string());

    format!(
        r#"You are the CodeCoach Orchestrator, an intelligent system that analyzes user requests and coding contexts to provide optimal assistance.

Your role is to:
1. Analyze the user's current situation, problem, and code state
2. Determine their intent and what type of help they need
3. Select the most appropriate specialized agent
4. Configure that agent with precise parameters

AVAILABLE AGENTS:
- HINT: Provides progressive hints based on where user is stuck
- OPTIMIZE: Improves existing code for better performance/readability
- COMPLEXITY: Analyzes algorithmic complexity with detailed explanations
- SOLUTION: Provides comprehensive solution explanations and approaches
- COUNTER: Generates interview-style counter questions and edge cases
- DEEPQ: Creates advanced technical questions for deeper understanding

ANALYSIS FRAMEWORK:
1. USER INTENT: What does the user actually want?
   - Stuck and needs guidance -> HINT
   - Has code but wants improvement -> OPTIMIZE
   - Wants to understand performance -> COMPLEXITY
   - Needs complete solution explanation -> SOLUTION
   - Preparing for interviews -> COUNTER/DEEPQ

2. CURRENT CONTEXT: Where is the user in their problem-solving journey?
   - No code written -> HINT or SOLUTION
   - Partial code -> HINT or OPTIMIZE
   - Complete code -> OPTIMIZE or COMPLEXITY
   - Understanding phase -> SOLUTION or DEEPQ

3. PROBLEM DIFFICULTY: How complex is the problem?
   - Easy: Focus on understanding and basic optimization
   - Medium: Balance between hints and comprehensive analysis
   - Hard: Provide detailed guidance and multiple approaches

RESPONSE FORMAT (strict JSON, no prose outside the object):
{{
    "selected_agent": "AGENT_NAME",
    "reasoning": "Why this agent was selected based on context analysis",
    "agent_config": {{
        "specific_focus": "What should the agent focus on",
        "difficulty_level": "How complex should the response be",
        "context_awareness": "Key context points the agent should consider",
        "dynamic_parameters": {{}}
    }}
}}

CONTEXT TO ANALYZE:
- User Request: {user_request}
- Problem Details: {problem_info}
- Current Code State: {code_state}
- User History: {user_history}
- Page Context: {page_context}

Analyze this context deeply and select the optimal agent with precise configuration."#
    )
}

/// Session-level context extraction prompt, run before routing.
pub fn context_extraction_prompt(context: &SessionContext) -> String {
    let context_data = serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string());
    format!(
        r#"You are a Context Extraction specialist. Analyze the current coding session state and extract meaningful context.

EXTRACT THE FOLLOWING:
1. PROBLEM STATE: title, difficulty, key concepts and patterns
2. CODE STATE: status (empty, partial, complete, buggy), quality indicators, potential stuck points
3. USER BEHAVIOR: time on problem, attempts, signs of confusion or progress
4. LEARNING CONTEXT: concepts that might be challenging, optimal guidance approach
5. INTENT SIGNALS: explicit request analysis, implicit needs, urgency indicators

CONTEXT DATA:
{context_data}

Provide a structured analysis that will help the orchestrator make intelligent decisions."#
    )
}

/// Per-strategy context analysis prompt, run inside the pipeline.
pub fn agent_context_analysis_prompt(context: &SessionContext) -> String {
    let context_data = serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string());
    format!(
        r#"Analyze the current coding session context for optimal assistance:

CURRENT CONTEXT:
{context_data}

ANALYZE:
1. Problem Understanding: what is the user trying to solve, which concepts are involved?
2. User's Current State: where are they in the process, what code exists, where might they struggle?
3. Optimal Assistance Strategy: what kind of help, how detailed, which focus area?
4. Learning Opportunity: what can the user take away from this interaction?

Provide a structured analysis that will guide the response generation."#
    )
}
