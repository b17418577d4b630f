use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::backend::CompletionBackend;
use crate::types::{
    kind_for_status, Completion, CompletionErrorKind, CompletionFailure, CompletionRequest,
    CompletionResult, TokenUsage,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAiBackend {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiBackend {
    pub fn new(client: Client, api_key: SecretString, base_url: Option<String>, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
        }
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = request.system_prompt.as_deref() {
            messages.push(ChatMessage { role: "system", content: system_prompt });
        }
        messages.push(ChatMessage { role: "user", content: &request.prompt });

        ChatRequest {
            model: &self.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

/// Pull the completion out of a chat-completions response body.
pub(crate) fn parse_chat_response(
    body: &serde_json::Value,
    fallback_model: &str,
) -> Result<Completion, CompletionFailure> {
    let text = body
        .pointer("/choices/0/message/content")
        .and_then(|content| content.as_str())
        .ok_or_else(|| {
            CompletionFailure::new(
                CompletionErrorKind::Provider,
                "chat response missing choices[0].message.content",
            )
        })?;

    let prompt_tokens =
        body.pointer("/usage/prompt_tokens").and_then(|count| count.as_u64()).unwrap_or(0);
    let completion_tokens =
        body.pointer("/usage/completion_tokens").and_then(|count| count.as_u64()).unwrap_or(0);
    let model = body
        .get("model")
        .and_then(|model| model.as_str())
        .unwrap_or(fallback_model)
        .to_string();

    Ok(Completion {
        text: text.trim().to_string(),
        usage: TokenUsage::new(prompt_tokens, completion_tokens),
        model,
    })
}

fn transport_failure(error: reqwest::Error) -> CompletionFailure {
    let kind = if error.is_connect() || error.is_timeout() {
        CompletionErrorKind::Connection
    } else {
        CompletionErrorKind::Unknown
    };
    CompletionFailure::new(kind, error.to_string())
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete_once(&self, request: &CompletionRequest) -> CompletionResult {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.body(request))
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionFailure::new(
                kind_for_status(status.as_u16()),
                format!("openai returned {status}: {message}"),
            ));
        }

        let body: serde_json::Value = response.json().await.map_err(transport_failure)?;
        parse_chat_response(&body, &self.model)
    }
}
