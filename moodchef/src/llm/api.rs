use std::time::Duration;

use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use backoff::{backoff::Backoff, ExponentialBackoff, ExponentialBackoffBuilder};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::{parse_llm_provider_model, LlmConfig},
    error::{MoodchefError, Result},
    llm::provider::CompletionOptions,
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
    max_retries: u32,
    defaults: CompletionOptions,
}

/// Only the fields the client reads; everything else in the body is ignored.
#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: UpstreamErrorDetail,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

/// Single-shot chat completion client.
///
/// Requests are built with the `async-openai` types and sent with `reqwest`
/// directly so the upstream HTTP status survives into [`MoodchefError::Upstream`].
#[derive(Clone)]
pub struct LlmApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_config = ApiConfig::from_llm_config(config);

        let (provider, _) = parse_llm_provider_model(&config.model);
        if provider_needs_api_key(provider) && api_config.api_key.is_none() {
            return Err(MoodchefError::Configuration(
                "LLM_API_KEY is not configured".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_config.timeout_secs))
            .build()
            .map_err(|error| {
                MoodchefError::Internal(format!("Failed to create LLM HTTP client: {error}"))
            })?;

        Ok(Self {
            http,
            config: api_config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send `prompt` and return the first choice's message content.
    ///
    /// Transport failures and 5xx responses are retried up to `max_retries`
    /// times with exponential backoff bounded by the request timeout.
    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(MoodchefError::Validation("Prompt cannot be empty".to_string()));
        }

        let request = self.build_request(prompt, system_prompt, options)?;
        let mut backoff = self.retry_policy();
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(&request).await {
                Ok(content) => {
                    debug!(
                        attempt,
                        response_len = content.len(),
                        "LLM completion received"
                    );
                    return Ok(content);
                }
                Err(error) if Self::is_retryable(&error) && attempt < self.config.max_retries => {
                    let Some(delay) = backoff.next_backoff() else {
                        return Err(error);
                    };
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient LLM failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn send_once(&self, request: &CreateChatCompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let mut builder = self.http.post(&url).json(request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|error| MoodchefError::Upstream {
            status: error.status().map(|s| s.as_u16()),
            message: format!("LLM request failed: {error}"),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| MoodchefError::Upstream {
            status: Some(status.as_u16()),
            message: format!("Failed to read LLM response body: {error}"),
        })?;

        if !status.is_success() {
            return Err(MoodchefError::Upstream {
                status: Some(status.as_u16()),
                message: Self::upstream_message(&body, status),
            });
        }

        Self::extract_content(&body)
    }

    #[allow(deprecated)]
    fn build_request(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<CreateChatCompletionRequest> {
        let mut messages = Vec::new();

        if let Some(system_prompt) = system_prompt.filter(|value| !value.trim().is_empty()) {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|error| {
                        MoodchefError::Validation(format!("Invalid system prompt: {error}"))
                    })?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|error| {
                    MoodchefError::Validation(format!("Invalid user prompt: {error}"))
                })?
                .into(),
        );

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(self.config.model.clone()).messages(messages);

        let temperature = options
            .and_then(|o| o.temperature)
            .or(self.config.defaults.temperature);
        if let Some(temperature) = temperature {
            request.temperature(temperature);
        }

        let max_tokens = options
            .and_then(|o| o.max_tokens)
            .or(self.config.defaults.max_tokens);
        if let Some(max_tokens) = max_tokens {
            request.max_tokens(max_tokens);
        }

        request.build().map_err(|error| {
            MoodchefError::Validation(format!("Invalid LLM completion request: {error}"))
        })
    }

    fn retry_policy(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(INITIAL_RETRY_DELAY)
            .with_multiplier(2.0)
            .with_randomization_factor(0.0)
            .with_max_elapsed_time(Some(Duration::from_secs(self.config.timeout_secs)))
            .build()
    }

    fn extract_content(body: &str) -> Result<String> {
        let parsed: CompletionBody = serde_json::from_str(body).map_err(|error| {
            MoodchefError::MalformedResponse(format!("completion body is not valid JSON: {error}"))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(MoodchefError::EmptyResponse);
        }

        Ok(content)
    }

    fn upstream_message(body: &str, status: reqwest::StatusCode) -> String {
        serde_json::from_str::<UpstreamErrorBody>(body)
            .map(|parsed| parsed.error.message)
            .unwrap_or_else(|_| {
                let preview: String = body.chars().take(200).collect();
                if preview.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    preview
                }
            })
    }

    fn is_retryable(error: &MoodchefError) -> bool {
        match error {
            MoodchefError::Upstream { status: None, .. } => true,
            MoodchefError::Upstream {
                status: Some(status),
                ..
            } => *status >= 500,
            _ => false,
        }
    }
}

impl ApiConfig {
    fn from_llm_config(config: &LlmConfig) -> Self {
        let (provider, model) = parse_llm_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        let normalized_model = if provider.eq_ignore_ascii_case("local") {
            config.model.clone()
        } else {
            model.to_string()
        };

        Self {
            base_url,
            api_key: config.api_key.clone(),
            model: normalized_model,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
            defaults: CompletionOptions {
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
        }
    }
}

pub(crate) fn provider_needs_api_key(provider: &str) -> bool {
    !matches!(
        provider.to_lowercase().as_str(),
        "ollama" | "local" | "lmstudio"
    )
}

pub(crate) fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => OPENAI_BASE_URL,
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}
