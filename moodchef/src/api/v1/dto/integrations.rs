use serde::Serialize;

use crate::models::IntegrationStatus;

/// Response for `GET /users/{userId}/integrations`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationsResponse {
    pub integrations: Vec<IntegrationStatus>,
}
