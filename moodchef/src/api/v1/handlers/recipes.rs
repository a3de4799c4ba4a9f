//! v1 Recipe generation and scaling handlers.

use axum::extract::{Path, State};
use validator::Validate;

use crate::api::extractors::V1Json;
use crate::api::v1::dto::{GenerateRecipesResponse, ScaleRecipeRequest, ScaleRecipeResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;
use crate::error::MoodchefError;
use crate::intelligence::scaling::serving_ratio;
use crate::models::RecipePreferences;

/// `POST /api/v1/users/{userId}/recipes:generate`
///
/// Asks the completion endpoint for recipes matching the search, personalized
/// with whatever profiles the user has.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/recipes:generate",
    tag = "recipes",
    operation_id = "recipes.generate",
    params(("userId" = String, Path, description = "User ID")),
    request_body = RecipePreferences,
    responses(
        (status = 200, description = "Generated recipes", body = GenerateRecipesResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 501, description = "No completion credential configured", body = ApiError),
        (status = 502, description = "Completion endpoint failed", body = ApiError),
    )
)]
pub async fn generate_recipes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    V1Json(prefs): V1Json<RecipePreferences>,
) -> ApiResponse<GenerateRecipesResponse> {
    let recipes = match state.recipes.generate(&user_id, &prefs).await {
        Ok(recipes) => recipes,
        Err(e) => return e.into(),
    };

    let total = recipes.len() as u64;
    ApiResponse::success_with_meta(GenerateRecipesResponse { recipes }, ResponseMeta { total })
}

/// `POST /api/v1/recipes:scale`
#[utoipa::path(
    post,
    path = "/api/v1/recipes:scale",
    tag = "recipes",
    operation_id = "recipes.scale",
    request_body = ScaleRecipeRequest,
    responses(
        (status = 200, description = "Scaled recipe", body = ScaleRecipeResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn scale_recipe(
    State(state): State<AppState>,
    V1Json(req): V1Json<ScaleRecipeRequest>,
) -> ApiResponse<ScaleRecipeResponse> {
    if let Err(e) = req.validate() {
        return MoodchefError::from(e).into();
    }

    let ratio = match serving_ratio(req.recipe.servings, req.target_servings) {
        Ok(ratio) => ratio,
        Err(e) => return e.into(),
    };

    match state.recipes.scale(&req.recipe, req.target_servings) {
        Ok(recipe) => ApiResponse::success(ScaleRecipeResponse { recipe, ratio }),
        Err(e) => e.into(),
    }
}
