use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::response::AgentKind;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("interaction sink unavailable: {0}")]
    Unavailable(String),
}

/// One completed request, recorded after the response is assembled.
/// Recording is best-effort: a sink failure never alters the response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InteractionRecord {
    pub record_id: String,
    pub correlation_id: String,
    pub user_id: Option<String>,
    pub user_request: String,
    pub agent_used: AgentKind,
    pub success: bool,
    pub confidence_score: f64,
    pub fallback_used: bool,
    pub occurred_at: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn new(
        correlation_id: impl Into<String>,
        user_id: Option<String>,
        user_request: impl Into<String>,
        agent_used: AgentKind,
        success: bool,
        confidence_score: f64,
        fallback_used: bool,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4().to_string(),
            correlation_id: correlation_id.into(),
            user_id,
            user_request: user_request.into(),
            agent_used,
            success,
            confidence_score,
            fallback_used,
            occurred_at: Utc::now(),
        }
    }
}

pub trait InteractionSink: Send + Sync {
    fn record(&self, record: InteractionRecord) -> Result<(), HistoryError>;
}

#[derive(Clone, Default)]
pub struct InMemoryInteractionSink {
    records: Arc<Mutex<Vec<InteractionRecord>>>,
}

impl InMemoryInteractionSink {
    pub fn records(&self) -> Vec<InteractionRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl InteractionSink for InMemoryInteractionSink {
    fn record(&self, record: InteractionRecord) -> Result<(), HistoryError> {
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
        Ok(())
    }
}
