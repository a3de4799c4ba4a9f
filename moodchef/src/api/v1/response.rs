//! # V1 API Response Envelope & Error Contract
//!
//! Every v1 endpoint returns an [`ApiResponse<T>`] envelope with three optional
//! top-level fields:
//!
//! ```json
//! {
//!   "data": { ... },                                   // present on success
//!   "meta": { "total": 42 },                           // optional, list endpoints
//!   "error": { "code": "not_found", "message": "..." } // present on error
//! }
//! ```
//!
//! ## ID Formats
//!
//! - **savedId**, history entry ids: nanoid, 21 characters
//! - **recipe ids** produced by generation: UUID v4 unless the model supplied one

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::MoodchefError;

/// Message returned for every failure that originates at the completion endpoint.
const UPSTREAM_MESSAGE: &str = "Recipe generation service is temporarily unavailable";

/// Machine-readable error code included in every error response.
///
/// Serialized as a snake_case string on the wire (e.g. `"invalid_request"`).
/// Each variant maps to a fixed HTTP status code via [`ErrorCode::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request was malformed, had invalid parameters, or failed validation.
    /// HTTP 400.
    InvalidRequest,
    /// Authentication is required or the provided credentials are invalid.
    /// HTTP 401.
    Unauthorized,
    /// The requested resource does not exist. HTTP 404.
    NotFound,
    /// The request conflicts with the current state of the resource. HTTP 409.
    Conflict,
    /// An unexpected server-side error occurred. HTTP 500.
    InternalError,
    /// The feature is unavailable in this deployment. HTTP 501.
    NotImplemented,
    /// The completion endpoint failed or replied with something unusable. HTTP 502.
    UpstreamError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::UpstreamError => StatusCode::BAD_GATEWAY,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InternalError => "internal_error",
            Self::NotImplemented => "not_implemented",
            Self::UpstreamError => "upstream_error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error payload within the API envelope.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    /// Safe to show to end users. Internal details are never included.
    pub message: String,
}

/// Metadata included in list responses.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    /// Number of items in `data`.
    pub total: u64,
}

/// Canonical v1 API response envelope.
///
/// On success `data` is present and `error` is absent; on error the reverse.
/// The HTTP status is derived from the error code, or set by the constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    /// HTTP status to use in the response. Not serialized on the wire.
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success response with data (HTTP 200).
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::OK,
        }
    }

    /// Success response with list metadata (HTTP 200).
    pub fn success_with_meta(data: T, meta: ResponseMeta) -> Self {
        Self {
            data: Some(data),
            meta: Some(meta),
            error: None,
            status: StatusCode::OK,
        }
    }

    /// Resource created response (HTTP 201).
    pub fn created(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::CREATED,
        }
    }

    /// Error response. HTTP status is derived from the [`ErrorCode`].
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let status = code.status();
        Self {
            data: None,
            meta: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            status,
        }
    }
}

impl ApiResponse<()> {
    /// Empty success for operations with nothing to return (HTTP 204).
    pub fn no_content() -> Self {
        Self {
            data: None,
            meta: None,
            error: None,
            status: StatusCode::NO_CONTENT,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }

        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(_) => {
                let body = serde_json::json!({
                    "error": {
                        "code": "internal_error",
                        "message": "An internal error occurred"
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<MoodchefError> for ApiResponse<T> {
    /// Convert a [`MoodchefError`] into a v1 [`ApiResponse`].
    ///
    /// Internal and upstream failures get a fixed message; the real error is
    /// logged.
    fn from(err: MoodchefError) -> Self {
        match err {
            MoodchefError::NotFound(msg) => ApiResponse::error(ErrorCode::NotFound, msg),

            MoodchefError::Validation(msg) => ApiResponse::error(ErrorCode::InvalidRequest, msg),

            MoodchefError::Json(e) => {
                ApiResponse::error(ErrorCode::InvalidRequest, format!("Invalid JSON: {e}"))
            }

            MoodchefError::Conflict(msg) => ApiResponse::error(ErrorCode::Conflict, msg),

            MoodchefError::Configuration(msg) => {
                ApiResponse::error(ErrorCode::NotImplemented, msg)
            }

            upstream @ (MoodchefError::Upstream { .. }
            | MoodchefError::EmptyResponse
            | MoodchefError::MalformedResponse(_)) => {
                tracing::warn!(error = %upstream, "Completion failure mapped to v1 response");
                ApiResponse::error(ErrorCode::UpstreamError, UPSTREAM_MESSAGE)
            }

            internal @ (MoodchefError::Database(_)
            | MoodchefError::Http(_)
            | MoodchefError::Internal(_)) => {
                tracing::error!(error = %internal, "Internal error mapped to v1 response");
                ApiResponse::error(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}
