//! Scripted backend for exercising gateway and orchestration behavior
//! without a live provider.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::backend::CompletionBackend;
use crate::types::{
    Completion, CompletionErrorKind, CompletionFailure, CompletionRequest, CompletionResult,
    TokenUsage,
};

enum Script {
    /// Pop one outcome per call; exhaustion is an Unknown failure.
    Sequence(Mutex<VecDeque<CompletionResult>>),
    /// Same text for every call.
    Fixed(String),
}

/// Deterministic [`CompletionBackend`] driven by a prepared script.
pub struct ScriptedBackend {
    script: Script,
    calls: AtomicUsize,
    call_instants: Mutex<Vec<Instant>>,
}

impl ScriptedBackend {
    /// One outcome per upcoming call, in order. `Ok(text)` becomes a full
    /// completion; `Err((kind, message))` becomes a failure of that kind.
    pub fn sequence<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<&'static str, (CompletionErrorKind, &'static str)>>,
    {
        let script = outcomes
            .into_iter()
            .map(|outcome| match outcome {
                Ok(text) => Ok(completion(text)),
                Err((kind, message)) => Err(CompletionFailure::new(kind, message)),
            })
            .collect();
        Self {
            script: Script::Sequence(Mutex::new(script)),
            calls: AtomicUsize::new(0),
            call_instants: Mutex::new(Vec::new()),
        }
    }

    pub fn fixed(text: impl Into<String>) -> Self {
        Self {
            script: Script::Fixed(text.into()),
            calls: AtomicUsize::new(0),
            call_instants: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Time elapsed between consecutive calls. Deterministic under the
    /// paused tokio clock, where each gap equals the sleep before the call.
    pub fn call_gaps(&self) -> Vec<Duration> {
        let instants = match self.call_instants.lock() {
            Ok(instants) => instants,
            Err(poisoned) => poisoned.into_inner(),
        };
        instants.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }
}

fn completion(text: &str) -> Completion {
    Completion {
        text: text.to_string(),
        usage: TokenUsage::new(10, text.split_whitespace().count() as u64),
        model: "scripted".to_string(),
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete_once(&self, _request: &CompletionRequest) -> CompletionResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.call_instants.lock() {
            Ok(mut instants) => instants.push(Instant::now()),
            Err(poisoned) => poisoned.into_inner().push(Instant::now()),
        }
        match &self.script {
            Script::Fixed(text) => Ok(completion(text)),
            Script::Sequence(outcomes) => {
                let mut outcomes = match outcomes.lock() {
                    Ok(outcomes) => outcomes,
                    Err(poisoned) => poisoned.into_inner(),
                };
                outcomes.pop_front().unwrap_or_else(|| {
                    Err(CompletionFailure::new(
                        CompletionErrorKind::Unknown,
                        "scripted backend exhausted",
                    ))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScriptedBackend;
    use crate::backend::CompletionBackend;
    use crate::types::{CompletionErrorKind, CompletionRequest};

    #[tokio::test]
    async fn sequence_pops_outcomes_then_reports_exhaustion() {
        let backend = ScriptedBackend::sequence([Ok("one")]);
        let request = CompletionRequest::new("p", 10, 0.0);

        assert_eq!(backend.complete_once(&request).await.expect("first").text, "one");
        let failure = backend.complete_once(&request).await.expect_err("exhausted");
        assert_eq!(failure.kind, CompletionErrorKind::Unknown);
        assert_eq!(backend.calls(), 2);
    }
}
