use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::backend::CompletionBackend;
use crate::types::{
    kind_for_status, Completion, CompletionErrorKind, CompletionFailure, CompletionRequest,
    CompletionResult, TokenUsage,
};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicBackend {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: [UserMessage<'a>; 1],
}

impl AnthropicBackend {
    pub fn new(client: Client, api_key: SecretString, base_url: Option<String>, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
        }
    }
}

pub(crate) fn parse_messages_response(
    body: &serde_json::Value,
    fallback_model: &str,
) -> Result<Completion, CompletionFailure> {
    let text = body
        .pointer("/content/0/text")
        .and_then(|content| content.as_str())
        .ok_or_else(|| {
            CompletionFailure::new(
                CompletionErrorKind::Provider,
                "messages response missing content[0].text",
            )
        })?;

    let prompt_tokens =
        body.pointer("/usage/input_tokens").and_then(|count| count.as_u64()).unwrap_or(0);
    let completion_tokens =
        body.pointer("/usage/output_tokens").and_then(|count| count.as_u64()).unwrap_or(0);
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
impl CompletionBackend for AnthropicBackend {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete_once(&self, request: &CompletionRequest) -> CompletionResult {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system_prompt.as_deref(),
            messages: [UserMessage { role: "user", content: &request.prompt }],
        };

        let response = self
            .client
            .post(url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionFailure::new(
                kind_for_status(status.as_u16()),
                format!("anthropic returned {status}: {message}"),
            ));
        }

        let body: serde_json::Value = response.json().await.map_err(transport_failure)?;
        parse_messages_response(&body, &self.model)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_messages_response;
    use crate::types::CompletionErrorKind;

    #[test]
    fn well_formed_response_parses_text_and_usage() {
        let body = json!({
            "model": "claude-3-5-haiku",
            "content": [{ "type": "text", "text": "Consider the two pointer pattern." }],
            "usage": { "input_tokens": 88, "output_tokens": 9 }
        });

        let completion = parse_messages_response(&body, "fallback").expect("parse");
        assert_eq!(completion.text, "Consider the two pointer pattern.");
        assert_eq!(completion.usage.prompt_tokens, 88);
        assert_eq!(completion.usage.total_tokens, 97);
    }

    #[test]
    fn empty_content_is_a_provider_failure() {
        let body = json!({ "content": [] });
        let failure = parse_messages_response(&body, "fallback").expect_err("no text");
        assert_eq!(failure.kind, CompletionErrorKind::Provider);
    }
}
