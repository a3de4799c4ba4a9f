//! v1 Profile handlers.

use axum::extract::{Path, State};
use validator::Validate;

use crate::api::extractors::V1Json;
use crate::api::v1::dto::{OnboardingRequest, ProfileOverviewResponse};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::MoodchefError;
use crate::models::{AiProfile, UserProfile};

/// `PUT /api/v1/users/{userId}/profile`
///
/// Stores the onboarding questionnaire. Dietary restrictions are replaced
/// only when the request lists at least one.
#[utoipa::path(
    put,
    path = "/api/v1/users/{userId}/profile",
    tag = "profile",
    operation_id = "profile.save",
    params(("userId" = String, Path, description = "User ID")),
    request_body = OnboardingRequest,
    responses(
        (status = 200, description = "Profile saved", body = UserProfile),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn save_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    V1Json(req): V1Json<OnboardingRequest>,
) -> ApiResponse<UserProfile> {
    if let Err(e) = req.validate() {
        return MoodchefError::from(e).into();
    }

    match state.profiles.save_onboarding(&user_id, req.into()).await {
        Ok(profile) => ApiResponse::success(profile),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{userId}/profile`
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/profile",
    tag = "profile",
    operation_id = "profile.get",
    params(("userId" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile overview", body = ProfileOverviewResponse),
        (status = 404, description = "Nothing stored for this user", body = ApiError),
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResponse<ProfileOverviewResponse> {
    match state.profiles.overview(&user_id).await {
        Ok(overview) => ApiResponse::success(ProfileOverviewResponse::from(overview)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{userId}/ai-profile`
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/ai-profile",
    tag = "profile",
    operation_id = "profile.getAi",
    params(("userId" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Current AI profile", body = AiProfile),
        (status = 404, description = "No ratings recorded yet", body = ApiError),
    )
)]
pub async fn get_ai_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResponse<AiProfile> {
    match state.profiles.ai_profile(&user_id).await {
        Ok(profile) => ApiResponse::success(profile),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/users/{userId}/ai-profile:regenerate`
///
/// Rebuilds the AI profile from the stored background and rating history.
/// The new profile replaces the old one under the usual version check.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/ai-profile:regenerate",
    tag = "profile",
    operation_id = "profile.regenerateAi",
    params(("userId" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Regenerated AI profile", body = AiProfile),
        (status = 404, description = "No background or ratings to build from", body = ApiError),
        (status = 409, description = "A concurrent update won the version race", body = ApiError),
        (status = 501, description = "No completion credential configured", body = ApiError),
        (status = 502, description = "Completion service failed", body = ApiError),
    )
)]
pub async fn regenerate_ai_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResponse<AiProfile> {
    match state.feedback.regenerate_profile(&user_id).await {
        Ok(profile) => ApiResponse::success(profile),
        Err(e) => e.into(),
    }
}
