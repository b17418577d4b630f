use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use codecoach_core::config::{LlmConfig, LlmProvider};

use crate::anthropic::AnthropicBackend;
use crate::gateway::CompletionGateway;
use crate::ollama::OllamaBackend;
use crate::openai::OpenAiBackend;

#[derive(Debug, Error)]
pub enum GatewayBuildError {
    #[error("llm.api_key is required for the {0} provider")]
    MissingApiKey(&'static str),
    #[error("llm.base_url is required for the ollama provider")]
    MissingBaseUrl,
    #[error("could not build http client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Build a gateway for the configured provider. Config validation normally
/// catches missing credentials first; the checks here make the factory safe
/// to call with an unvalidated config.
pub fn gateway_from_config(config: &LlmConfig) -> Result<CompletionGateway, GatewayBuildError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let gateway = match config.provider {
        LlmProvider::OpenAi => {
            let api_key = config
                .api_key
                .clone()
                .ok_or(GatewayBuildError::MissingApiKey("openai"))?;
            CompletionGateway::new(Arc::new(OpenAiBackend::new(
                client,
                api_key,
                config.base_url.clone(),
                config.model.clone(),
            )))
        }
        LlmProvider::Anthropic => {
            let api_key = config
                .api_key
                .clone()
                .ok_or(GatewayBuildError::MissingApiKey("anthropic"))?;
            CompletionGateway::new(Arc::new(AnthropicBackend::new(
                client,
                api_key,
                config.base_url.clone(),
                config.model.clone(),
            )))
        }
        LlmProvider::Ollama => {
            let base_url = config.base_url.clone().ok_or(GatewayBuildError::MissingBaseUrl)?;
            CompletionGateway::new(Arc::new(OllamaBackend::new(
                client,
                base_url,
                config.model.clone(),
            )))
        }
    };

    Ok(gateway)
}

#[cfg(test)]
mod tests {
    use codecoach_core::config::{LlmConfig, LlmProvider};

    use super::{gateway_from_config, GatewayBuildError};

    fn base_config(provider: LlmProvider) -> LlmConfig {
        LlmConfig {
            provider,
            api_key: None,
            base_url: None,
            model: "llama3.1".to_string(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }

    #[test]
    fn openai_without_api_key_is_rejected() {
        let error = gateway_from_config(&base_config(LlmProvider::OpenAi)).expect_err("no key");
        assert!(matches!(error, GatewayBuildError::MissingApiKey("openai")));
    }

    #[test]
    fn ollama_without_base_url_is_rejected() {
        let error = gateway_from_config(&base_config(LlmProvider::Ollama)).expect_err("no url");
        assert!(matches!(error, GatewayBuildError::MissingBaseUrl));
    }

    #[test]
    fn ollama_with_base_url_builds() {
        let config = LlmConfig {
            base_url: Some("http://localhost:11434".to_string()),
            ..base_config(LlmProvider::Ollama)
        };
        let gateway = gateway_from_config(&config).expect("build");
        assert_eq!(gateway.backend_name(), "ollama");
    }

    #[test]
    fn anthropic_with_api_key_builds() {
        let config = LlmConfig {
            api_key: Some("sk-ant-test".to_string().into()),
            ..base_config(LlmProvider::Anthropic)
        };
        let gateway = gateway_from_config(&config).expect("build");
        assert_eq!(gateway.backend_name(), "anthropic");
    }
}
