use async_trait::async_trait;

use crate::types::{CompletionRequest, CompletionResult};

/// One provider API. Implementations perform a single attempt; retry policy
/// lives in the gateway.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete_once(&self, request: &CompletionRequest) -> CompletionResult;
}
