use std::sync::Arc;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{MoodchefError, Result};
use crate::llm::api::{default_base_url, provider_needs_api_key, LlmApiClient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Cheap-to-clone handle on the configured completion backend.
///
/// A provider without a usable credential is still constructed; calls on it
/// fail with [`MoodchefError::Configuration`] so the service keeps running.
#[derive(Debug, Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    config: Option<Arc<LlmConfig>>,
}

impl LlmProvider {
    pub fn new(config: &LlmConfig) -> Self {
        let (provider, _model) = parse_llm_provider_model(&config.model);

        if provider_needs_api_key(provider) && config.api_key.is_none() {
            return Self::unavailable("LLM_API_KEY is not configured");
        }

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => {
                if let Some(base_url) = &config.base_url {
                    LlmBackend::OpenAICompatible {
                        base_url: base_url.clone(),
                    }
                } else {
                    LlmBackend::Unavailable {
                        reason: format!("Unknown provider in model: {}", config.model),
                    }
                }
            }
        };

        Self {
            backend,
            config: Some(Arc::new(config.clone())),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, LlmBackend::Unavailable { .. })
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn config(&self) -> Option<&LlmConfig> {
        self.config.as_deref()
    }

    pub fn provider_name(&self) -> &'static str {
        match self.backend {
            LlmBackend::OpenAI => "openai",
            LlmBackend::OpenRouter => "openrouter",
            LlmBackend::Ollama => "ollama",
            LlmBackend::LmStudio => "lmstudio",
            LlmBackend::OpenAICompatible { .. } => "openai-compatible",
            LlmBackend::Unavailable { .. } => "unavailable",
        }
    }

    /// Endpoint base the client will post to, if the provider is usable.
    pub fn base_url(&self) -> Option<&str> {
        let config = self.config()?;
        match &self.backend {
            LlmBackend::Unavailable { .. } => None,
            LlmBackend::OpenAICompatible { base_url } => Some(base_url.as_str()),
            _ => Some(config.base_url.as_deref().unwrap_or_else(|| {
                let (provider, _) = parse_llm_provider_model(&config.model);
                default_base_url(provider)
            })),
        }
    }

    pub async fn complete(
        &self,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        self.complete_with_system(prompt, None, options).await
    }

    pub async fn complete_with_system(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        let config = self.usable_config()?;
        let client = LlmApiClient::new(config)?;
        client.complete(prompt, system_prompt, options).await
    }

    fn usable_config(&self) -> Result<&LlmConfig> {
        if let LlmBackend::Unavailable { reason } = &self.backend {
            return Err(MoodchefError::Configuration(reason.clone()));
        }

        self.config()
            .ok_or_else(|| MoodchefError::Configuration("No LLM configuration".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            model: model.to_string(),
            api_key: api_key.map(str::to_string),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn missing_key_makes_provider_unavailable() {
        let provider = LlmProvider::new(&config("openai/gpt-4o-mini", None));
        assert!(!provider.is_available());
        assert!(provider.base_url().is_none());
    }

    #[test]
    fn local_model_without_base_url_is_unavailable() {
        let provider = LlmProvider::new(&config("my-model", None));
        assert!(matches!(provider.backend(), LlmBackend::Unavailable { .. }));
    }

    #[test]
    fn compatible_backend_uses_configured_base_url() {
        let mut cfg = config("my-model", None);
        cfg.base_url = Some("http://llm.internal/v1".to_string());
        let provider = LlmProvider::new(&cfg);

        assert_eq!(provider.provider_name(), "openai-compatible");
        assert_eq!(provider.base_url(), Some("http://llm.internal/v1"));
    }

    #[tokio::test]
    async fn unavailable_provider_returns_configuration_error() {
        let provider = LlmProvider::unavailable("no key");
        let result = provider.complete("hello", None).await;
        assert!(matches!(result, Err(MoodchefError::Configuration(_))));
    }
}
