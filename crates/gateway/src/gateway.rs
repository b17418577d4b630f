use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::backend::CompletionBackend;
use crate::types::{CompletionRequest, CompletionResult};

/// Retrying wrapper around a [`CompletionBackend`].
///
/// Retry policy: up to `max_retries` additional attempts after the first,
/// sleeping `2^attempt` seconds between attempts (1s, 2s, 4s, ...). Terminal
/// failures short-circuit immediately.
#[derive(Clone)]
pub struct CompletionGateway {
    backend: Arc<dyn CompletionBackend>,
}

impl std::fmt::Debug for CompletionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionGateway")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl CompletionGateway {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn complete(&self, request: &CompletionRequest, max_retries: u32) -> CompletionResult {
        let mut last_failure = None;

        for attempt in 0..=max_retries {
            match self.backend.complete_once(request).await {
                Ok(completion) => return Ok(completion),
                Err(failure) => {
                    if failure.kind.is_terminal() {
                        return Err(failure);
                    }
                    warn!(
                        event_name = "gateway.attempt_failed",
                        backend = self.backend.name(),
                        attempt,
                        kind = ?failure.kind,
                        "completion attempt failed"
                    );
                    last_failure = Some(failure);
                }
            }

            if attempt < max_retries {
                tokio::time::sleep(Duration::from_secs(2u64.pow(attempt))).await;
            }
        }

        // max_retries is finite, so at least one attempt ran and failed.
        Err(last_failure.unwrap_or_else(|| {
            crate::types::CompletionFailure::new(
                crate::types::CompletionErrorKind::Unknown,
                "no completion attempts were made",
            )
        }))
    }

    /// Tiny fixed completion used by the doctor command. Healthy means the
    /// provider answered at all; the text is not inspected.
    pub async fn health_probe(&self) -> CompletionResult {
        let request = CompletionRequest::new(
            "Hello, this is a health check. Please respond with 'OK'.",
            10,
            0.0,
        );
        self.backend.complete_once(&request).await
    }
}
