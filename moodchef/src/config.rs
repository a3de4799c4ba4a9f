use serde::Deserialize;
use std::env;

pub(crate) fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

/// Empty strings count as unset so `LLM_API_KEY=` in a `.env` behaves like a missing key.
fn non_empty_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub profile: ProfileConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

/// Completion endpoint configuration. The credential is optional here so the
/// service can start without one; calls fail with a configuration error instead.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "openai/gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 30,
            max_retries: 2,
            temperature: Some(0.7),
            max_tokens: Some(2000),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    /// How many recent ratings feed the profile update statistics.
    pub history_limit: u32,
    /// How many recent ratings the profile overview returns.
    pub overview_history_limit: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            history_limit: 10,
            overview_history_limit: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let llm_defaults = LlmConfig::default();
        let profile_defaults = ProfileConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("MOODCHEF_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("MOODCHEF_PORT", 3000),
                api_keys: env::var("MOODCHEF_API_KEYS")
                    .map(|keys| {
                        keys.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:moodchef.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            llm: LlmConfig {
                model: env::var("LLM_MODEL").unwrap_or(llm_defaults.model),
                api_key: non_empty_env("LLM_API_KEY"),
                base_url: non_empty_env("LLM_BASE_URL"),
                timeout_secs: parse_env_or("LLM_TIMEOUT", llm_defaults.timeout_secs),
                max_retries: parse_env_or("LLM_MAX_RETRIES", llm_defaults.max_retries),
                temperature: parse_env_opt("LLM_TEMPERATURE").or(llm_defaults.temperature),
                max_tokens: parse_env_opt("LLM_MAX_TOKENS").or(llm_defaults.max_tokens),
            },
            profile: ProfileConfig {
                history_limit: parse_env_or(
                    "PROFILE_HISTORY_LIMIT",
                    profile_defaults.history_limit,
                ),
                overview_history_limit: parse_env_or(
                    "PROFILE_OVERVIEW_HISTORY_LIMIT",
                    profile_defaults.overview_history_limit,
                ),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}
