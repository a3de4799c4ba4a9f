use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{EnergyLevel, Mood, ANY_CUISINE};

/// Flat record gathered from one recipe search.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipePreferences {
    #[validate(length(min = 1, message = "at least one ingredient is required"))]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Empty or `["Any"]` means unconstrained.
    #[serde(default)]
    pub cuisine_preferences: Vec<String>,
    pub mood_level: Mood,
    pub energy_level: EnergyLevel,
    /// Maximum cooking time in minutes.
    #[serde(default = "default_cooking_time")]
    #[validate(range(min = 1))]
    pub cooking_time: u32,
    #[serde(default = "default_servings")]
    #[validate(range(min = 1, max = 100))]
    pub servings: u32,
}

fn default_cooking_time() -> u32 {
    60
}

fn default_servings() -> u32 {
    4
}

impl RecipePreferences {
    /// Cuisines the user actually constrained the search to, or `None`
    /// when the list is empty or only holds the "Any" sentinel.
    pub fn constrained_cuisines(&self) -> Option<Vec<&str>> {
        let cuisines: Vec<&str> = self
            .cuisine_preferences
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ANY_CUISINE))
            .collect();

        if cuisines.is_empty() {
            None
        } else {
            Some(cuisines)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, utoipa::ToSchema)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Unknown labels fall back to `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "easy" | "beginner" | "simple" => Self::Easy,
            "hard" | "difficult" | "advanced" => Self::Hard,
            _ => Self::Medium,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "Easy"),
            Self::Medium => write!(f, "Medium"),
            Self::Hard => write!(f, "Hard"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, utoipa::ToSchema)]
#[serde(default)]
pub struct Nutrition {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub fiber: u32,
}

/// Normalized recipe. Every field is populated, see
/// [`crate::intelligence::parser`] for how partial model output is defaulted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    pub id: String,
    #[serde(alias = "title")]
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: u32,
    pub cook_time: u32,
    pub total_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    #[serde(alias = "cuisineType")]
    pub cuisine: String,
    pub dietary_info: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "nutritionalInfo")]
    pub nutrition: Option<Nutrition>,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: String::new(),
            description: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            prep_time: 0,
            cook_time: 0,
            total_time: 0,
            servings: 0,
            difficulty: Difficulty::Medium,
            cuisine: String::new(),
            dietary_info: Vec::new(),
            tags: Vec::new(),
            nutrition: None,
        }
    }
}

/// A recipe the user bookmarked. The recipe body is stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: String,
    pub user_id: String,
    pub recipe_name: String,
    pub recipe: serde_json::Value,
    pub cooked_count: u32,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(cuisines: &[&str]) -> RecipePreferences {
        RecipePreferences {
            ingredients: vec!["rice".into()],
            dietary_restrictions: vec![],
            cuisine_preferences: cuisines.iter().map(|c| c.to_string()).collect(),
            mood_level: Mood::Neutral,
            energy_level: EnergyLevel::Medium,
            cooking_time: 30,
            servings: 2,
        }
    }

    #[test]
    fn any_and_empty_cuisines_are_unconstrained() {
        assert!(prefs(&[]).constrained_cuisines().is_none());
        assert!(prefs(&["Any"]).constrained_cuisines().is_none());
        assert_eq!(
            prefs(&["Any", "Thai"]).constrained_cuisines(),
            Some(vec!["Thai"])
        );
    }

    #[test]
    fn preferences_require_ingredients() {
        let mut p = prefs(&[]);
        assert!(p.validate().is_ok());
        p.ingredients.clear();
        assert!(p.validate().is_err());
    }

    #[test]
    fn preferences_apply_form_defaults() {
        let p: RecipePreferences = serde_json::from_str(
            r#"{"ingredients":["egg"],"moodLevel":"comfort","energyLevel":"low"}"#,
        )
        .unwrap();
        assert_eq!(p.cooking_time, 60);
        assert_eq!(p.servings, 4);
        assert!(p.dietary_restrictions.is_empty());
    }

    #[test]
    fn recipe_accepts_title_alias() {
        let r: Recipe = serde_json::from_str(r#"{"title":"Soup","servings":3}"#).unwrap();
        assert_eq!(r.name, "Soup");
        assert_eq!(r.servings, 3);
        assert_eq!(r.difficulty, Difficulty::Medium);
        assert!(!r.id.is_empty());
    }

    #[test]
    fn difficulty_lenient_parse() {
        assert_eq!(Difficulty::parse_lenient("EASY"), Difficulty::Easy);
        assert_eq!(Difficulty::parse_lenient("expert-ish"), Difficulty::Medium);
    }
}
