#![allow(dead_code)]

use std::sync::{Arc, Once};

use serde_json::json;
use tempfile::TempDir;

use moodchef::config::{DatabaseConfig, LlmConfig};
use moodchef::db::{Database, DatabaseBackend, LibSqlBackend};
use moodchef::llm::LlmProvider;

static INIT_LOGGER: Once = Once::new();

/// Route `tracing` output through the test harness. Honors `RUST_LOG`.
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "moodchef=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Chat completion body carrying `content` as the assistant message.
pub fn llm_response(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": 20,
            "total_tokens": 30
        }
    })
}

pub fn llm_config(base_url: String, max_retries: u32) -> LlmConfig {
    LlmConfig {
        model: "openai/gpt-4o-mini".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url),
        timeout_secs: 5,
        max_retries,
        ..LlmConfig::default()
    }
}

pub fn test_llm_provider(base_url: String) -> LlmProvider {
    LlmProvider::new(&llm_config(base_url, 0))
}

/// File-backed database in a fresh temp dir. Keep the `TempDir` alive for
/// the duration of the test.
pub async fn test_database() -> (Arc<dyn DatabaseBackend>, TempDir) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = DatabaseConfig {
        url: format!("file:{}", temp_dir.path().join("moodchef_test.db").display()),
        auth_token: None,
        local_path: None,
    };
    let db = Database::new(&config)
        .await
        .expect("failed to open test database");
    (Arc::new(LibSqlBackend::new(db)), temp_dir)
}
