//! Onboarding and profile DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::HistoryEntryResponse;
use crate::models::{AiProfile, DietaryRestriction, HealthGoals, UserProfile};
use crate::services::{Onboarding, ProfileOverview};

/// Request body for `PUT /users/{userId}/profile`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[serde(default)]
    pub age_range: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub ethnicity: String,
    #[serde(default)]
    pub cuisine_preferences: Vec<String>,
    #[serde(default)]
    pub disliked_foods: Vec<String>,
    #[serde(default)]
    pub health_goals: HealthGoals,
    pub cooking_skill: Option<String>,
    /// Replaces the stored restriction set when non-empty.
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl From<OnboardingRequest> for Onboarding {
    fn from(req: OnboardingRequest) -> Self {
        Self {
            name: req.name,
            age_range: req.age_range,
            gender: req.gender,
            ethnicity: req.ethnicity,
            cuisine_preferences: req.cuisine_preferences,
            disliked_foods: req.disliked_foods,
            health_goals: req.health_goals,
            cooking_skill: req.cooking_skill,
            dietary_restrictions: req.dietary_restrictions,
        }
    }
}

/// Response for `GET /users/{userId}/profile`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOverviewResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
    pub dietary_restrictions: Vec<DietaryRestriction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_profile: Option<AiProfile>,
    pub recent_history: Vec<HistoryEntryResponse>,
}

impl From<ProfileOverview> for ProfileOverviewResponse {
    fn from(overview: ProfileOverview) -> Self {
        Self {
            user_profile: overview.user_profile,
            dietary_restrictions: overview.dietary_restrictions,
            ai_profile: overview.ai_profile,
            recent_history: overview
                .recent_history
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onboarding_request_minimal() {
        let req: OnboardingRequest = serde_json::from_str(r#"{"name": "Rin"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.dietary_restrictions.is_empty());
        assert!(req.health_goals.is_empty());
    }

    #[test]
    fn onboarding_request_rejects_empty_name() {
        let req: OnboardingRequest = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn onboarding_request_full() {
        let req: OnboardingRequest = serde_json::from_str(
            r#"{
                "name": "Rin",
                "ageRange": "35-44",
                "cuisinePreferences": ["Korean"],
                "dislikedFoods": ["cilantro"],
                "healthGoals": {"weightManagement": "lose", "specificGoals": ["less sugar"]},
                "cookingSkill": "beginner",
                "dietaryRestrictions": ["Dairy-Free"]
            }"#,
        )
        .unwrap();
        let onboarding = Onboarding::from(req);
        assert_eq!(onboarding.health_goals.weight_management, "lose");
        assert_eq!(onboarding.dietary_restrictions, vec!["Dairy-Free"]);
        assert_eq!(onboarding.cooking_skill.as_deref(), Some("beginner"));
    }
}
