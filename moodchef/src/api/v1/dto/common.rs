//! Shared DTO types used by more than one v1 endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{LikedAspect, Mood, RecipeHistoryEntry};

const DEFAULT_HISTORY_LIMIT: u32 = 20;
const MAX_HISTORY_LIMIT: u32 = 100;

/// Query parameters for `GET /users/{userId}/history`.
///
/// `limit` defaults to 20 and is clamped to `1..=100`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

impl HistoryQuery {
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

/// One rated recipe as returned on the wire.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub id: String,
    pub recipe_name: String,
    /// Recipe body exactly as submitted with the rating.
    #[schema(value_type = Object)]
    pub recipe: serde_json::Value,
    pub rating: u8,
    pub liked_aspects: Vec<LikedAspect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_text: Option<String>,
    pub mood_at_rating: Mood,
    /// AI profile version in effect when the rating was given.
    pub ai_profile_version_used: u32,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<RecipeHistoryEntry> for HistoryEntryResponse {
    fn from(entry: RecipeHistoryEntry) -> Self {
        Self {
            id: entry.id,
            recipe_name: entry.recipe_name,
            recipe: entry.recipe,
            rating: entry.rating,
            liked_aspects: entry.liked_aspects,
            feedback_text: entry.feedback_text,
            mood_at_rating: entry.mood_at_rating,
            ai_profile_version_used: entry.ai_profile_version_used,
            created_at: entry.created_at,
        }
    }
}
