use axum::extract::{Path, State};

use crate::api::v1::dto::IntegrationsResponse;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::api::AppState;
use crate::models::{IntegrationStatus, IntegrationType};

/// `GET /api/v1/users/{userId}/integrations`
///
/// One entry per known integration type, disconnected unless a stored row
/// says otherwise.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/integrations",
    tag = "integrations",
    operation_id = "integrations.list",
    params(("userId" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Integration statuses", body = IntegrationsResponse),
    )
)]
pub async fn list_integrations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResponse<IntegrationsResponse> {
    match state.integrations.list(&user_id).await {
        Ok(integrations) => {
            let total = integrations.len() as u64;
            ApiResponse::success_with_meta(IntegrationsResponse { integrations }, ResponseMeta { total })
        }
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/users/{userId}/integrations/{integrationType}/connect`
///
/// No integration can be linked yet, so known types answer 501.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/integrations/{integrationType}/connect",
    tag = "integrations",
    operation_id = "integrations.connect",
    params(
        ("userId" = String, Path, description = "User ID"),
        ("integrationType" = String, Path, description = "Integration type, e.g. apple_health"),
    ),
    responses(
        (status = 200, description = "Integration connected", body = IntegrationStatus),
        (status = 400, description = "Unknown integration type", body = ApiError),
        (status = 501, description = "Integration not available yet", body = ApiError),
    )
)]
pub async fn connect_integration(
    State(state): State<AppState>,
    Path((user_id, integration_type)): Path<(String, String)>,
) -> ApiResponse<IntegrationStatus> {
    let integration_type: IntegrationType = match integration_type.parse() {
        Ok(t) => t,
        Err(message) => return ApiResponse::error(ErrorCode::InvalidRequest, message),
    };

    match state.integrations.connect(&user_id, integration_type).await {
        Ok(status) => ApiResponse::success(status),
        Err(e) => e.into(),
    }
}
