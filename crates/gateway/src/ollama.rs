use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::backend::CompletionBackend;
use crate::types::{
    kind_for_status, Completion, CompletionErrorKind, CompletionFailure, CompletionRequest,
    CompletionResult, TokenUsage,
};

pub struct OllamaBackend {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

impl OllamaBackend {
    pub fn new(client: Client, base_url: String, model: String) -> Self {
        Self { client, base_url, model }
    }
}

pub(crate) fn parse_generate_response(
    body: &serde_json::Value,
    fallback_model: &str,
) -> Result<Completion, CompletionFailure> {
    let text = body.get("response").and_then(|text| text.as_str()).ok_or_else(|| {
        CompletionFailure::new(
            CompletionErrorKind::Provider,
            "generate response missing `response` field",
        )
    })?;

    let prompt_tokens =
        body.get("prompt_eval_count").and_then(|count| count.as_u64()).unwrap_or(0);
    let completion_tokens = body.get("eval_count").and_then(|count| count.as_u64()).unwrap_or(0);
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
impl CompletionBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete_once(&self, request: &CompletionRequest) -> CompletionResult {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            system: request.system_prompt.as_deref(),
            stream: false,
            options: GenerateOptions {
                num_predict: request.max_tokens,
                temperature: request.temperature,
            },
        };

        let response =
            self.client.post(url).json(&body).send().await.map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionFailure::new(
                kind_for_status(status.as_u16()),
                format!("ollama returned {status}: {message}"),
            ));
        }

        let body: serde_json::Value = response.json().await.map_err(transport_failure)?;
        parse_generate_response(&body, &self.model)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_generate_response;
    use crate::types::CompletionErrorKind;

    #[test]
    fn well_formed_response_parses_text_and_counts() {
        let body = json!({
            "model": "llama3.1",
            "response": "Think about what you could precompute.\n",
            "prompt_eval_count": 55,
            "eval_count": 8,
            "done": true
        });

        let completion = parse_generate_response(&body, "fallback").expect("parse");
        assert_eq!(completion.text, "Think about what you could precompute.");
        assert_eq!(completion.usage.total_tokens, 63);
        assert_eq!(completion.model, "llama3.1");
    }

    #[test]
    fn missing_response_field_is_a_provider_failure() {
        let body = json!({ "done": true });
        let failure = parse_generate_response(&body, "fallback").expect_err("no text");
        assert_eq!(failure.kind, CompletionErrorKind::Provider);
    }
}
