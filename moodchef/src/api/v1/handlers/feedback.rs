//! v1 Feedback and history handlers.

use axum::extract::{Path, Query, State};

use crate::api::extractors::V1Json;
use crate::api::v1::dto::{
    FeedbackResponse, HistoryEntryResponse, HistoryQuery, HistoryResponse, SubmitFeedbackRequest,
};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;

/// `POST /api/v1/users/{userId}/feedback`
///
/// Records the rating, then tries to evolve the AI profile. A failed profile
/// update still returns 201 with `profileUpdated: false`.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/feedback",
    tag = "feedback",
    operation_id = "feedback.submit",
    params(("userId" = String, Path, description = "User ID")),
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 201, description = "Rating recorded", body = FeedbackResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    V1Json(req): V1Json<SubmitFeedbackRequest>,
) -> ApiResponse<FeedbackResponse> {
    let event = req.event();
    let outcome = match state
        .feedback
        .submit(&user_id, &req.recipe_name, req.recipe, &event)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return e.into(),
    };

    ApiResponse::created(FeedbackResponse {
        history_entry: HistoryEntryResponse::from(outcome.history_entry),
        profile_updated: outcome.ai_profile.is_some(),
        ai_profile: outcome.ai_profile,
    })
}

/// `GET /api/v1/users/{userId}/history`
///
/// Most recent ratings first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/history",
    tag = "feedback",
    operation_id = "feedback.history",
    params(("userId" = String, Path, description = "User ID"), HistoryQuery),
    responses(
        (status = 200, description = "Rating history", body = HistoryResponse),
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResponse<HistoryResponse> {
    let entries = match state
        .feedback
        .history(&user_id, query.effective_limit())
        .await
    {
        Ok(entries) => entries,
        Err(e) => return e.into(),
    };

    let total = entries.len() as u64;
    ApiResponse::success_with_meta(
        HistoryResponse {
            entries: entries.into_iter().map(Into::into).collect(),
        },
        ResponseMeta { total },
    )
}
