//! Recipe generation, scaling and saved-recipe DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Recipe, SavedRecipe};

/// Response for `POST /users/{userId}/recipes:generate`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRecipesResponse {
    pub recipes: Vec<Recipe>,
}

/// Request body for `POST /recipes:scale`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRecipeRequest {
    pub recipe: Recipe,
    #[validate(range(min = 1, max = 100, message = "targetServings must be between 1 and 100"))]
    pub target_servings: u32,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRecipeResponse {
    pub recipe: Recipe,
    /// Target servings divided by the recipe's original servings.
    pub ratio: f64,
}

/// Request body for `POST /users/{userId}/saved-recipes`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecipeRequest {
    /// Stored verbatim. Must carry a `name` (or `title`).
    #[schema(value_type = Object)]
    pub recipe: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipeResponse {
    pub id: String,
    pub recipe_name: String,
    #[schema(value_type = Object)]
    pub recipe: serde_json::Value,
    pub cooked_count: u32,
    #[schema(value_type = String)]
    pub saved_at: DateTime<Utc>,
}

impl From<SavedRecipe> for SavedRecipeResponse {
    fn from(saved: SavedRecipe) -> Self {
        Self {
            id: saved.id,
            recipe_name: saved.recipe_name,
            recipe: saved.recipe,
            cooked_count: saved.cooked_count,
            saved_at: saved.saved_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListSavedRecipesResponse {
    pub saved_recipes: Vec<SavedRecipeResponse>,
}
