use thiserror::Error;

/// One completion request. Token and temperature budgets are set by the
/// caller; backends never apply their own defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32, temperature: f64) -> Self {
        Self { prompt: prompt.into(), system_prompt: None, max_tokens, temperature }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self { prompt_tokens, completion_tokens, total_tokens: prompt_tokens + completion_tokens }
    }
}

/// A successful completion. Either fully present or absent; a failed call
/// never yields a partially filled completion.
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
    pub model: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionErrorKind {
    /// Transport failure: connect, DNS, timeout.
    Connection,
    /// Provider throttled the request.
    RateLimit,
    /// The request itself was rejected (auth, malformed body).
    InvalidRequest,
    /// Provider-side failure (5xx).
    Provider,
    Unknown,
}

impl CompletionErrorKind {
    /// Terminal kinds are never retried: the same request would fail again
    /// (or, for rate limits, make things worse).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::RateLimit | Self::InvalidRequest)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("completion failed ({kind:?}): {message}")]
pub struct CompletionFailure {
    pub kind: CompletionErrorKind,
    pub message: String,
}

impl CompletionFailure {
    pub fn new(kind: CompletionErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

pub type CompletionResult = Result<Completion, CompletionFailure>;

/// Map an HTTP status onto an error kind shared by all backends.
pub fn kind_for_status(status: u16) -> CompletionErrorKind {
    match status {
        429 => CompletionErrorKind::RateLimit,
        400..=499 => CompletionErrorKind::InvalidRequest,
        500..=599 => CompletionErrorKind::Provider,
        _ => CompletionErrorKind::Unknown,
    }
}
