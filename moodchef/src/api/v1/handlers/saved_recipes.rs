//! v1 Saved recipe handlers.

use axum::extract::{Path, State};

use crate::api::extractors::V1Json;
use crate::api::v1::dto::{ListSavedRecipesResponse, SaveRecipeRequest, SavedRecipeResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;

/// `GET /api/v1/users/{userId}/saved-recipes`
///
/// Newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}/saved-recipes",
    tag = "saved-recipes",
    operation_id = "savedRecipes.list",
    params(("userId" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Saved recipes", body = ListSavedRecipesResponse),
    )
)]
pub async fn list_saved_recipes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResponse<ListSavedRecipesResponse> {
    let saved = match state.recipes.list_saved(&user_id).await {
        Ok(saved) => saved,
        Err(e) => return e.into(),
    };

    let total = saved.len() as u64;
    ApiResponse::success_with_meta(
        ListSavedRecipesResponse {
            saved_recipes: saved.into_iter().map(Into::into).collect(),
        },
        ResponseMeta { total },
    )
}

/// `POST /api/v1/users/{userId}/saved-recipes`
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/saved-recipes",
    tag = "saved-recipes",
    operation_id = "savedRecipes.create",
    params(("userId" = String, Path, description = "User ID")),
    request_body = SaveRecipeRequest,
    responses(
        (status = 201, description = "Recipe saved", body = SavedRecipeResponse),
        (status = 400, description = "Recipe has no name", body = ApiError),
    )
)]
pub async fn save_recipe(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    V1Json(req): V1Json<SaveRecipeRequest>,
) -> ApiResponse<SavedRecipeResponse> {
    match state.recipes.save(&user_id, req.recipe).await {
        Ok(saved) => ApiResponse::created(SavedRecipeResponse::from(saved)),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/users/{userId}/saved-recipes/{savedId}/cook`
///
/// Records that the user cooked the recipe once more.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/saved-recipes/{savedId}/cook",
    tag = "saved-recipes",
    operation_id = "savedRecipes.cook",
    params(
        ("userId" = String, Path, description = "User ID"),
        ("savedId" = String, Path, description = "Saved recipe ID"),
    ),
    responses(
        (status = 200, description = "Cooked count incremented", body = SavedRecipeResponse),
        (status = 404, description = "Saved recipe not found", body = ApiError),
    )
)]
pub async fn cook_saved_recipe(
    State(state): State<AppState>,
    Path((user_id, saved_id)): Path<(String, String)>,
) -> ApiResponse<SavedRecipeResponse> {
    match state.recipes.mark_cooked(&user_id, &saved_id).await {
        Ok(saved) => ApiResponse::success(SavedRecipeResponse::from(saved)),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/users/{userId}/saved-recipes/{savedId}`
#[utoipa::path(
    delete,
    path = "/api/v1/users/{userId}/saved-recipes/{savedId}",
    tag = "saved-recipes",
    operation_id = "savedRecipes.delete",
    params(
        ("userId" = String, Path, description = "User ID"),
        ("savedId" = String, Path, description = "Saved recipe ID"),
    ),
    responses(
        (status = 204, description = "Saved recipe deleted"),
        (status = 404, description = "Saved recipe not found", body = ApiError),
    )
)]
pub async fn delete_saved_recipe(
    State(state): State<AppState>,
    Path((user_id, saved_id)): Path<(String, String)>,
) -> ApiResponse<()> {
    match state.recipes.remove_saved(&user_id, &saved_id).await {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => e.into(),
    }
}
