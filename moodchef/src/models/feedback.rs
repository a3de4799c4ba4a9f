use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::Mood;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LikedAspect {
    Taste,
    Easy,
    Healthy,
    Quick,
    Filling,
    Ingredients,
    Presentation,
    MoodMatch,
}

impl LikedAspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Taste => "taste",
            Self::Easy => "easy",
            Self::Healthy => "healthy",
            Self::Quick => "quick",
            Self::Filling => "filling",
            Self::Ingredients => "ingredients",
            Self::Presentation => "presentation",
            Self::MoodMatch => "mood-match",
        }
    }
}

impl std::fmt::Display for LikedAspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rating of one recipe. Consumed to write a history row and drive a
/// profile update; never stored on its own.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEvent {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: u8,
    #[serde(default)]
    pub liked_aspects: Vec<LikedAspect>,
    #[validate(length(max = 2000))]
    pub improvements: Option<String>,
    #[serde(default)]
    pub mood: Mood,
}

impl FeedbackEvent {
    /// Aspects in submission order with duplicates removed.
    pub fn distinct_aspects(&self) -> Vec<LikedAspect> {
        let mut seen = Vec::with_capacity(self.liked_aspects.len());
        for aspect in &self.liked_aspects {
            if !seen.contains(aspect) {
                seen.push(*aspect);
            }
        }
        seen
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeHistoryEntry {
    pub id: String,
    pub user_id: String,
    pub recipe_name: String,
    pub recipe: serde_json::Value,
    pub rating: u8,
    pub liked_aspects: Vec<LikedAspect>,
    pub feedback_text: Option<String>,
    pub mood_at_rating: Mood,
    pub ai_profile_version_used: u32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liked_aspect_uses_kebab_case() {
        let json = serde_json::to_value(LikedAspect::MoodMatch).unwrap();
        assert_eq!(json, "mood-match");
        let parsed: LikedAspect = serde_json::from_str("\"presentation\"").unwrap();
        assert_eq!(parsed, LikedAspect::Presentation);
    }

    #[test]
    fn rating_out_of_range_fails_validation() {
        let event = FeedbackEvent {
            rating: 6,
            liked_aspects: vec![],
            improvements: None,
            mood: Mood::Happy,
        };
        assert!(event.validate().is_err());
    }

    #[test]
    fn distinct_aspects_keeps_first_occurrence() {
        let event = FeedbackEvent {
            rating: 4,
            liked_aspects: vec![LikedAspect::Quick, LikedAspect::Taste, LikedAspect::Quick],
            improvements: None,
            mood: Mood::Neutral,
        };
        assert_eq!(
            event.distinct_aspects(),
            vec![LikedAspect::Quick, LikedAspect::Taste]
        );
    }
}
