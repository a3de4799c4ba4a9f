//! Bearer token authentication for the protected v1 routes.
//!
//! Tokens are checked against `MOODCHEF_API_KEYS`. Rejections use the v1
//! envelope so clients see the same error shape everywhere.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;

use super::response::{ApiResponse, ErrorCode};

fn unauthorized(message: &str) -> Response {
    ApiResponse::<()>::error(ErrorCode::Unauthorized, message).into_response()
}

/// With no keys configured the server still starts, but every protected
/// route answers 401 until keys are set.
pub async fn v1_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let keys = &state.config.server.api_keys;
    if keys.is_empty() {
        return unauthorized("API keys not configured. Set MOODCHEF_API_KEYS to enable access.");
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(token) => token.trim(),
            None => {
                return unauthorized(
                    "Invalid authorization header format. Expected: Bearer <token>",
                )
            }
        },
        None => return unauthorized("Missing authorization header"),
    };

    if keys.iter().any(|key| key == token) {
        next.run(request).await
    } else {
        tracing::debug!("Rejected request with unknown API key");
        unauthorized("Invalid API key")
    }
}
