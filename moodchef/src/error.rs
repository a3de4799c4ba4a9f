use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoodchefError {
    /// No completion credential configured. Not retryable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-success response (or transport failure when `status` is `None`)
    /// from the completion endpoint.
    #[error("Upstream error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Completion response contained no message content")]
    EmptyResponse,

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Lost a compare-and-swap on a versioned row.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl MoodchefError {
    /// Failures that originate from the completion endpoint's reply shape or status.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            MoodchefError::Upstream { .. }
                | MoodchefError::EmptyResponse
                | MoodchefError::MalformedResponse(_)
        )
    }
}

impl IntoResponse for MoodchefError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            MoodchefError::Configuration(msg) => (StatusCode::NOT_IMPLEMENTED, msg.clone()),
            MoodchefError::Upstream { .. }
            | MoodchefError::EmptyResponse
            | MoodchefError::MalformedResponse(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            MoodchefError::Database(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            MoodchefError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            MoodchefError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            MoodchefError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            MoodchefError::Http(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            MoodchefError::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            MoodchefError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for MoodchefError {
    fn from(errors: validator::ValidationErrors) -> Self {
        MoodchefError::Validation(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MoodchefError>;
