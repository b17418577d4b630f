//! Agent orchestration - context-aware routing and strategy execution
//!
//! This crate is the decision-making layer of codecoach:
//! - Analyzes the session context with a scoped completion call
//! - Routes each request to one of six closed strategies
//! - Runs the selected strategy through a shared completion pipeline
//! - Extracts structured data and scores confidence deterministically
//!
//! # Architecture
//!
//! The request path is a constrained loop:
//! 1. **Context Analysis** (`orchestrator`) - summarize the session state
//! 2. **Routing** (`orchestrator` + core `routing`) - pick a strategy, with
//!    layered fallbacks that always land on a valid strategy
//! 3. **Execution** (`pipeline`) - prompt the model via the gateway
//! 4. **Assembly** (`pipeline`) - extract, score, and stamp metadata
//!
//! # Safety Principle
//!
//! The LLM only produces text. Routing fallbacks, extraction, and confidence
//! scoring are deterministic and never depend on model cooperation.

pub mod orchestrator;
pub mod pipeline;
pub mod prompts;
pub mod strategy;

pub use orchestrator::Orchestrator;
pub use pipeline::AgentPipeline;
pub use strategy::{StrategyProfile, StrategyRegistry};
