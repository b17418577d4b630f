use std::fs;
use std::path::Path;
use std::sync::Arc;

use codecoach_agent::Orchestrator;
use codecoach_core::config::{AppConfig, LoadOptions, LogFormat};
use codecoach_core::{HistoryError, InteractionRecord, InteractionSink, SessionContext};
use codecoach_gateway::gateway_from_config;

use crate::commands::CommandResult;

/// Sink that narrates each interaction through the tracing pipeline. The CLI
/// is single-shot, so durable history buys nothing here.
struct LoggingSink;

impl InteractionSink for LoggingSink {
    fn record(&self, record: InteractionRecord) -> Result<(), HistoryError> {
        tracing::info!(
            event_name = "cli.interaction_recorded",
            correlation_id = %record.correlation_id,
            agent_used = %record.agent_used,
            success = record.success,
            confidence_score = record.confidence_score,
            fallback_used = record.fallback_used,
            "interaction recorded"
        );
        Ok(())
    }
}

pub fn run(
    request: &str,
    context_path: Option<&Path>,
    config_path: Option<&Path>,
    json_output: bool,
) -> CommandResult {
    let options = LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        ..LoadOptions::default()
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure(2, format!("config validation failed: {error}")),
    };

    init_logging(&config);

    let context = match load_context(context_path) {
        Ok(context) => context,
        Err(error) => return CommandResult::failure(3, error),
    };

    let gateway = match gateway_from_config(&config.llm) {
        Ok(gateway) => gateway,
        Err(error) => {
            return CommandResult::failure(4, format!("failed to build LLM gateway: {error}"))
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(5, format!("failed to initialize async runtime: {error}"))
        }
    };

    let orchestrator = Orchestrator::new(gateway, Arc::new(LoggingSink));
    let response = runtime.block_on(orchestrator.handle_request(request, &context));

    let output = if json_output {
        serde_json::to_string_pretty(&response)
            .unwrap_or_else(|error| format!("failed to serialize response: {error}"))
    } else {
        render_human(&response)
    };

    let exit_code = if response.success { 0 } else { 1 };
    CommandResult { exit_code, output }
}

fn load_context(path: Option<&Path>) -> Result<SessionContext, String> {
    let Some(path) = path else {
        return Ok(SessionContext::default());
    };

    let raw = fs::read_to_string(path)
        .map_err(|error| format!("failed to read context file `{}`: {error}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|error| format!("failed to parse context file `{}`: {error}", path.display()))
}

fn render_human(response: &codecoach_core::AgentResponse) -> String {
    let mut lines = vec![
        format!(
            "agent: {} (confidence {:.2}, {}ms)",
            response.agent_kind, response.confidence_score, response.processing_time_ms
        ),
    ];
    if let Some(decision) = response.metadata.get("orchestration_decision") {
        if decision.get("fallback_used").and_then(|value| value.as_bool()) == Some(true) {
            lines.push("routing: keyword fallback (the model did not produce a valid decision)"
                .to_string());
        }
    }
    lines.push(String::new());
    lines.push(response.response_text.clone());
    lines.join("\n")
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    // try_init: the subscriber may already be installed when commands run
    // back to back inside one process, as in tests.
    let builder = tracing_subscriber::fmt().with_target(false).with_max_level(log_level);
    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
