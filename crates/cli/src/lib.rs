pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "codecoach",
    about = "CodeCoach operator CLI",
    long_about = "Route coding-assistance requests through the orchestrator, inspect effective configuration, and run provider readiness checks.",
    after_help = "Examples:\n  codecoach ask \"give me a hint for two sum\" --context session.json\n  codecoach config\n  codecoach doctor --json --probe"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Send one request through the orchestrator and print the agent response")]
    Ask {
        #[arg(help = "The natural-language request to route")]
        request: String,
        #[arg(long, help = "Path to a session context JSON file (problem, code, history)")]
        context: Option<PathBuf>,
        #[arg(long, help = "Path to a config file (defaults to codecoach.toml)")]
        config: Option<PathBuf>,
        #[arg(long, help = "Emit the full agent response as JSON")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config and LLM provider readiness checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(long, help = "Send a tiny completion to the provider to verify connectivity")]
        probe: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Ask { request, context, config, json } => {
            commands::ask::run(&request, context.as_deref(), config.as_deref(), json)
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json, probe } => {
            commands::doctor::run(json, probe)
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
