use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthGoals {
    pub weight_management: String,
    pub energy_level: String,
    pub specific_goals: Vec<String>,
}

impl HealthGoals {
    pub fn is_empty(&self) -> bool {
        self.weight_management.trim().is_empty()
            && self.energy_level.trim().is_empty()
            && self.specific_goals.is_empty()
    }
}

/// Questionnaire answers captured during onboarding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub age_range: String,
    pub gender: String,
    pub ethnicity: String,
    pub cuisine_preferences: Vec<String>,
    pub disliked_foods: Vec<String>,
    pub health_goals: HealthGoals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_skill: Option<String>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DietaryRestriction {
    pub id: String,
    pub user_id: String,
    pub restriction_type: String,
    pub severity: u8,
}

/// Model-maintained personality profile. `version` grows by exactly one per
/// successful update and `profile_strength` is capped at [`AiProfile::MAX_STRENGTH`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiProfile {
    pub user_id: String,
    pub personality_profile: String,
    pub dietary_summary: String,
    pub mood_preferences: String,
    pub energy_patterns: String,
    pub profile_strength: u32,
    pub version: u32,
    #[schema(value_type = String)]
    pub last_updated: DateTime<Utc>,
}

impl AiProfile {
    pub const MAX_STRENGTH: u32 = 100;

    /// Apply a model-produced update on top of `current`, bumping version and strength.
    pub fn evolve(user_id: &str, current: Option<&AiProfile>, update: ProfileUpdate) -> Self {
        let (strength, version) = current
            .map(|p| (p.profile_strength, p.version))
            .unwrap_or((0, 0));

        Self {
            user_id: user_id.to_string(),
            personality_profile: update.personality_profile,
            dietary_summary: update.dietary_summary,
            mood_preferences: update.mood_preferences,
            energy_patterns: update.energy_patterns,
            profile_strength: (strength + 1).min(Self::MAX_STRENGTH),
            version: version + 1,
            last_updated: Utc::now(),
        }
    }
}

/// The four free-text fields the model is asked to return.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProfileUpdate {
    pub personality_profile: String,
    pub dietary_summary: String,
    pub mood_preferences: String,
    pub energy_patterns: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(strength: u32, version: u32) -> AiProfile {
        AiProfile {
            user_id: "u1".into(),
            personality_profile: "old".into(),
            dietary_summary: String::new(),
            mood_preferences: String::new(),
            energy_patterns: String::new(),
            profile_strength: strength,
            version,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn first_profile_starts_at_version_one() {
        let p = AiProfile::evolve("u1", None, ProfileUpdate::default());
        assert_eq!(p.version, 1);
        assert_eq!(p.profile_strength, 1);
    }

    #[test]
    fn evolve_bumps_version_and_strength() {
        let current = profile(41, 7);
        let p = AiProfile::evolve(
            "u1",
            Some(&current),
            ProfileUpdate {
                personality_profile: "new".into(),
                ..Default::default()
            },
        );
        assert_eq!(p.version, 8);
        assert_eq!(p.profile_strength, 42);
        assert_eq!(p.personality_profile, "new");
    }

    #[test]
    fn strength_is_capped() {
        let current = profile(100, 120);
        let p = AiProfile::evolve("u1", Some(&current), ProfileUpdate::default());
        assert_eq!(p.profile_strength, 100);
        assert_eq!(p.version, 121);
    }

    #[test]
    fn health_goals_empty_detection() {
        assert!(HealthGoals::default().is_empty());
        let goals = HealthGoals {
            specific_goals: vec!["more protein".into()],
            ..Default::default()
        };
        assert!(!goals.is_empty());
    }
}
