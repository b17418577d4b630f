pub mod config;
pub mod domain;
pub mod extraction;
pub mod history;
pub mod routing;
pub mod scoring;

pub use domain::context::{
    Difficulty, InteractionEntry, PageContext, ProblemInfo, SessionContext, UserCode,
};
pub use domain::decision::{AgentConfiguration, OrchestrationDecision};
pub use domain::response::{AgentKind, AgentResponse};
pub use history::{
    HistoryError, InMemoryInteractionSink, InteractionRecord, InteractionSink,
};
pub use routing::DecisionParseError;
pub use scoring::{ConfidenceScorer, BASE_TECHNICAL_TERMS};
