//! Feedback DTOs.

use serde::{Deserialize, Serialize};

use super::common::HistoryEntryResponse;
use crate::models::{AiProfile, FeedbackEvent, LikedAspect, Mood};

/// Request body for `POST /users/{userId}/feedback`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub recipe_name: String,
    /// The rated recipe, stored with the history row.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub recipe: serde_json::Value,
    /// 1 to 5.
    pub rating: u8,
    #[serde(default)]
    pub liked_aspects: Vec<LikedAspect>,
    pub improvements: Option<String>,
    #[serde(default)]
    pub mood: Mood,
}

impl SubmitFeedbackRequest {
    pub fn event(&self) -> FeedbackEvent {
        FeedbackEvent {
            rating: self.rating,
            liked_aspects: self.liked_aspects.clone(),
            improvements: self.improvements.clone(),
            mood: self.mood,
        }
    }
}

/// Response for `POST /users/{userId}/feedback`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub history_entry: HistoryEntryResponse,
    /// False when the profile update was skipped or failed. The rating is
    /// recorded either way.
    pub profile_updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_profile: Option<AiProfile>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntryResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_request_minimal() {
        let req: SubmitFeedbackRequest =
            serde_json::from_str(r#"{"recipeName": "Chili", "rating": 5}"#).unwrap();
        let event = req.event();
        assert_eq!(event.rating, 5);
        assert!(event.liked_aspects.is_empty());
        assert_eq!(event.mood, Mood::Neutral);
        assert!(req.recipe.is_null());
    }

    #[test]
    fn feedback_request_full() {
        let req: SubmitFeedbackRequest = serde_json::from_str(
            r#"{"recipeName": "Chili", "recipe": {"name": "Chili"}, "rating": 3,
                "likedAspects": ["quick", "mood-match"], "improvements": "spicier", "mood": "stressed"}"#,
        )
        .unwrap();
        let event = req.event();
        assert_eq!(
            event.liked_aspects,
            vec![LikedAspect::Quick, LikedAspect::MoodMatch]
        );
        assert_eq!(event.improvements.as_deref(), Some("spicier"));
        assert_eq!(event.mood, Mood::Stressed);
    }
}
