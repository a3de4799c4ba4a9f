use std::sync::Arc;

use chrono::Utc;
use nanoid::nanoid;

use crate::db::DatabaseBackend;
use crate::error::{MoodchefError, Result};
use crate::models::{
    AiProfile, DietaryRestriction, HealthGoals, RecipeHistoryEntry, UserProfile,
    DIETARY_OPTIONS,
};

/// Severity assigned to restrictions picked during onboarding.
const DEFAULT_SEVERITY: u8 = 3;

/// Onboarding questionnaire answers as submitted.
#[derive(Debug, Clone, Default)]
pub struct Onboarding {
    pub name: String,
    pub age_range: String,
    pub gender: String,
    pub ethnicity: String,
    pub cuisine_preferences: Vec<String>,
    pub disliked_foods: Vec<String>,
    pub health_goals: HealthGoals,
    pub cooking_skill: Option<String>,
    pub dietary_restrictions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileOverview {
    pub user_profile: Option<UserProfile>,
    pub dietary_restrictions: Vec<DietaryRestriction>,
    pub ai_profile: Option<AiProfile>,
    pub recent_history: Vec<RecipeHistoryEntry>,
}

#[derive(Clone)]
pub struct ProfileService {
    db: Arc<dyn DatabaseBackend>,
    overview_history_limit: u32,
}

impl ProfileService {
    pub fn new(db: Arc<dyn DatabaseBackend>, overview_history_limit: u32) -> Self {
        Self {
            db,
            overview_history_limit,
        }
    }

    /// Upsert the questionnaire row, then replace the restriction set when
    /// one was given. The writes are sequential; a failure on the second
    /// leaves the first in place.
    pub async fn save_onboarding(&self, user_id: &str, input: Onboarding) -> Result<UserProfile> {
        if input.name.trim().is_empty() {
            return Err(MoodchefError::Validation("name must not be empty".to_string()));
        }

        let restrictions = normalize_restrictions(user_id, &input.dietary_restrictions);
        let profile = UserProfile {
            user_id: user_id.to_string(),
            name: input.name.trim().to_string(),
            age_range: input.age_range,
            gender: input.gender,
            ethnicity: input.ethnicity,
            cuisine_preferences: dedup_trimmed(&input.cuisine_preferences),
            disliked_foods: dedup_trimmed(&input.disliked_foods),
            health_goals: input.health_goals,
            cooking_skill: input.cooking_skill.filter(|s| !s.trim().is_empty()),
            updated_at: Utc::now(),
        };

        self.db.upsert_user_profile(&profile).await?;
        if !restrictions.is_empty() {
            self.db
                .replace_dietary_restrictions(user_id, &restrictions)
                .await?;
        }

        tracing::info!(
            user_id,
            restrictions = restrictions.len(),
            "Onboarding profile saved"
        );
        Ok(profile)
    }

    pub async fn overview(&self, user_id: &str) -> Result<ProfileOverview> {
        let (user_profile, dietary_restrictions, ai_profile, recent_history) = futures::try_join!(
            self.db.get_user_profile(user_id),
            self.db.list_dietary_restrictions(user_id),
            self.db.get_ai_profile(user_id),
            self.db.recent_history(user_id, self.overview_history_limit),
        )?;

        if user_profile.is_none() && ai_profile.is_none() && recent_history.is_empty() {
            return Err(MoodchefError::NotFound(format!(
                "No profile found for user {user_id}"
            )));
        }

        Ok(ProfileOverview {
            user_profile,
            dietary_restrictions,
            ai_profile,
            recent_history,
        })
    }

    pub async fn ai_profile(&self, user_id: &str) -> Result<AiProfile> {
        self.db
            .get_ai_profile(user_id)
            .await?
            .ok_or_else(|| MoodchefError::NotFound(format!("No AI profile for user {user_id}")))
    }
}

fn dedup_trimmed(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        if !out.iter().any(|existing| existing.eq_ignore_ascii_case(value)) {
            out.push(value.to_string());
        }
    }
    out
}

/// Known options are stored with their canonical spelling; anything else
/// is kept as typed.
fn normalize_restrictions(user_id: &str, values: &[String]) -> Vec<DietaryRestriction> {
    dedup_trimmed(values)
        .into_iter()
        .map(|value| {
            let restriction_type = DIETARY_OPTIONS
                .iter()
                .find(|option| option.eq_ignore_ascii_case(&value))
                .map_or(value, |option| option.to_string());
            DietaryRestriction {
                id: nanoid!(),
                user_id: user_id.to_string(),
                restriction_type,
                severity: DEFAULT_SEVERITY,
            }
        })
        .collect()
}
