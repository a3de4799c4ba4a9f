use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};

use crate::api::v1::response::ApiResponse;
use crate::error::MoodchefError;

/// `axum::Json` whose rejections are rendered as v1 error envelopes.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonBodyRejection))]
pub struct V1Json<T>(pub T);

#[derive(Debug)]
pub struct JsonBodyRejection(MoodchefError);

impl From<JsonRejection> for JsonBodyRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self(map_json_rejection(rejection))
    }
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        ApiResponse::<()>::from(self.0).into_response()
    }
}

fn map_json_rejection(rejection: JsonRejection) -> MoodchefError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let message = err.body_text();
            match extract_missing_field(&message) {
                Some(field) => MoodchefError::Validation(format!("Missing required field: {field}")),
                None => MoodchefError::Validation(format!("Invalid request body: {message}")),
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            MoodchefError::Validation(format!("JSON syntax error: {}", err.body_text()))
        }
        JsonRejection::MissingJsonContentType(_) => MoodchefError::Validation(
            "Missing `Content-Type: application/json` header".to_string(),
        ),
        JsonRejection::BytesRejection(_) => {
            MoodchefError::Internal("Failed to read request body".to_string())
        }
        other => MoodchefError::Validation(other.body_text()),
    }
}

fn extract_missing_field(message: &str) -> Option<&str> {
    let prefix = "missing field `";
    let start = message.find(prefix)? + prefix.len();
    let remaining = message.get(start..)?;
    let end = remaining.find('`')?;
    remaining.get(..end)
}
