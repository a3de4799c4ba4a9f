//! Prompt templates for recipe generation and profile evolution.
//!
//! Both builders are pure: the same inputs always produce the same text, and
//! absent optional inputs simply drop their segment.

use crate::intelligence::utils::HistoryStats;
use crate::models::{AiProfile, FeedbackEvent, RecipePreferences, UserProfile};

const RECIPE_SCHEMA_EXAMPLE: &str = r#"[
  {
    "id": "unique-id",
    "name": "Recipe Name",
    "description": "One or two sentences describing the dish",
    "ingredients": ["2 cups cooked rice", "1 tbsp soy sauce"],
    "instructions": ["Step one", "Step two"],
    "prepTime": 10,
    "cookTime": 20,
    "totalTime": 30,
    "servings": 4,
    "difficulty": "Easy",
    "cuisine": "Asian",
    "dietaryInfo": ["Dairy-Free"],
    "tags": ["quick", "weeknight"],
    "nutrition": {"calories": 450, "protein": 25, "carbs": 50, "fat": 12, "fiber": 4}
  }
]"#;

/// Build the recipe generation prompt.
///
/// # Example
/// ```
/// use moodchef::llm::prompts::recipe_generation_prompt;
/// use moodchef::models::{EnergyLevel, Mood, RecipePreferences};
///
/// let prefs = RecipePreferences {
///     ingredients: vec!["chicken".into(), "rice".into()],
///     dietary_restrictions: vec![],
///     cuisine_preferences: vec![],
///     mood_level: Mood::Happy,
///     energy_level: EnergyLevel::Medium,
///     cooking_time: 30,
///     servings: 2,
/// };
/// let prompt = recipe_generation_prompt(&prefs, None, None);
/// assert!(prompt.contains("chicken, rice"));
/// ```
pub fn recipe_generation_prompt(
    prefs: &RecipePreferences,
    user_profile: Option<&UserProfile>,
    ai_profile: Option<&AiProfile>,
) -> String {
    let mut prompt = format!(
        "Create 3 personalized recipes using these ingredients: {ingredients}.\n\
         Current mood: {mood}\n\
         Energy level: {energy}\n\
         Maximum cooking time: {time} minutes\n\
         Servings: {servings}\n",
        ingredients = prefs.ingredients.join(", "),
        mood = prefs.mood_level,
        energy = prefs.energy_level,
        time = prefs.cooking_time,
        servings = prefs.servings,
    );

    if !prefs.dietary_restrictions.is_empty() {
        prompt.push_str(&format!(
            "Dietary restrictions: {}\n",
            prefs.dietary_restrictions.join(", ")
        ));
    }

    if let Some(cuisines) = prefs.constrained_cuisines() {
        prompt.push_str(&format!("Preferred cuisine: {}\n", cuisines.join(", ")));
    }

    if let Some(profile) = user_profile {
        push_user_background(&mut prompt, profile);
    }

    if let Some(ai) = ai_profile {
        push_non_empty(&mut prompt, "Personality profile", &ai.personality_profile);
        push_non_empty(&mut prompt, "Dietary summary", &ai.dietary_summary);
        push_non_empty(&mut prompt, "Mood preferences", &ai.mood_preferences);
    }

    prompt.push_str(&format!(
        "\nEvery ingredient string must start with a numeric quantity and unit, \
         scaled so the recipe serves exactly {servings}. \
         Keep each recipe within {time} minutes total.\n\
         Respond with valid JSON only, mirroring this structure exactly:\n{schema}",
        servings = prefs.servings,
        time = prefs.cooking_time,
        schema = RECIPE_SCHEMA_EXAMPLE,
    ));

    prompt
}

/// Build the prompt asking the model to revise the personality profile after
/// one rating.
pub fn profile_update_prompt(
    recipe_name: &str,
    feedback: &FeedbackEvent,
    current: Option<&AiProfile>,
    stats: &HistoryStats,
    background: Option<&UserProfile>,
) -> String {
    let aspects = feedback
        .distinct_aspects()
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "Update this user's cooking personality profile based on new recipe feedback.\n\n\
         CURRENT FEEDBACK:\n\
         - Recipe: {recipe_name}\n\
         - Rating: {rating}/5\n\
         - Liked aspects: {aspects}\n\
         - Improvements: {improvements}\n\
         - Mood at rating: {mood}\n",
        rating = feedback.rating,
        aspects = if aspects.is_empty() { "none" } else { aspects.as_str() },
        improvements = feedback
            .improvements
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("none"),
        mood = feedback.mood,
    );

    push_profile_context(&mut prompt, current, stats, background);
    prompt
}

/// Prompt for rebuilding a profile on request, from stored history and
/// background alone. There is no triggering rating.
pub fn profile_regeneration_prompt(
    current: Option<&AiProfile>,
    stats: &HistoryStats,
    background: Option<&UserProfile>,
) -> String {
    let mut prompt = String::from(
        "Rebuild this user's cooking personality profile from scratch using their \
         background and rating history. Treat any current profile as a rough draft.\n",
    );
    push_profile_context(&mut prompt, current, stats, background);
    prompt
}

fn push_profile_context(
    prompt: &mut String,
    current: Option<&AiProfile>,
    stats: &HistoryStats,
    background: Option<&UserProfile>,
) {
    if let Some(profile) = current {
        prompt.push_str(&format!(
            "\nCURRENT PROFILE (version {version}, strength {strength}/100):\n\
             - Personality: {personality}\n\
             - Dietary summary: {dietary}\n\
             - Mood preferences: {mood}\n\
             - Energy patterns: {energy}\n",
            version = profile.version,
            strength = profile.profile_strength,
            personality = profile.personality_profile,
            dietary = profile.dietary_summary,
            mood = profile.mood_preferences,
            energy = profile.energy_patterns,
        ));
    }

    if stats.count > 0 {
        let top = stats
            .top_aspects
            .iter()
            .map(|(aspect, n)| format!("{aspect} ({n})"))
            .collect::<Vec<_>>()
            .join(", ");
        prompt.push_str(&format!(
            "\nRECENT HISTORY ({count} ratings):\n\
             - Average rating: {avg:.1}/5\n\
             - Most liked aspects: {top}\n",
            count = stats.count,
            avg = stats.average_rating,
            top = if top.is_empty() { "none".to_string() } else { top },
        ));
    }

    if let Some(profile) = background {
        prompt.push_str("\nUSER BACKGROUND:\n");
        push_user_background(prompt, profile);
    }

    prompt.push_str(
        "\nReturn a JSON object with exactly these four string fields and nothing else:\n\
         {\n  \"personality_profile\": \"...\",\n  \"dietary_summary\": \"...\",\n  \
         \"mood_preferences\": \"...\",\n  \"energy_patterns\": \"...\"\n}",
    );
}

fn push_user_background(prompt: &mut String, profile: &UserProfile) {
    if !profile.cuisine_preferences.is_empty() {
        prompt.push_str(&format!(
            "Favorite cuisines: {}\n",
            profile.cuisine_preferences.join(", ")
        ));
    }
    if !profile.disliked_foods.is_empty() {
        prompt.push_str(&format!(
            "Disliked foods (avoid): {}\n",
            profile.disliked_foods.join(", ")
        ));
    }

    let goals = &profile.health_goals;
    if !goals.is_empty() {
        let mut parts = Vec::new();
        if !goals.weight_management.trim().is_empty() {
            parts.push(format!("weight: {}", goals.weight_management));
        }
        if !goals.energy_level.trim().is_empty() {
            parts.push(format!("energy: {}", goals.energy_level));
        }
        if !goals.specific_goals.is_empty() {
            parts.push(goals.specific_goals.join(", "));
        }
        prompt.push_str(&format!("Health goals: {}\n", parts.join("; ")));
    }
}

fn push_non_empty(prompt: &mut String, label: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        prompt.push_str(&format!("{label}: {value}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnergyLevel, HealthGoals, LikedAspect, Mood};
    use chrono::Utc;

    fn prefs() -> RecipePreferences {
        RecipePreferences {
            ingredients: vec!["chicken".into(), "rice".into()],
            dietary_restrictions: vec![],
            cuisine_preferences: vec![],
            mood_level: Mood::Happy,
            energy_level: EnergyLevel::Medium,
            cooking_time: 30,
            servings: 2,
        }
    }

    fn user_profile() -> UserProfile {
        UserProfile {
            user_id: "u1".into(),
            name: "Sam".into(),
            age_range: "25-34".into(),
            gender: "prefer not to say".into(),
            ethnicity: "other".into(),
            cuisine_preferences: vec!["Thai".into(), "Korean".into()],
            disliked_foods: vec!["cilantro".into()],
            health_goals: HealthGoals::default(),
            cooking_skill: None,
            updated_at: Utc::now(),
        }
    }

    fn ai_profile() -> AiProfile {
        AiProfile {
            user_id: "u1".into(),
            personality_profile: "Loves bold, spicy flavors".into(),
            dietary_summary: "".into(),
            mood_preferences: "Craves soup when stressed".into(),
            energy_patterns: "Cooks more on weekends".into(),
            profile_strength: 12,
            version: 4,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_recipe_prompt_contains_required_values() {
        let prompt = recipe_generation_prompt(&prefs(), None, None);
        assert!(prompt.contains("chicken, rice"));
        assert!(prompt.contains("happy"));
        assert!(prompt.contains("medium"));
        assert!(prompt.contains("30 minutes"));
        assert!(prompt.contains("Servings: 2"));
        assert!(prompt.contains("\"prepTime\""));
    }

    #[test]
    fn test_recipe_prompt_omits_unconstrained_cuisine() {
        let mut p = prefs();
        assert!(!recipe_generation_prompt(&p, None, None).contains("Preferred cuisine"));

        p.cuisine_preferences = vec!["Any".into()];
        assert!(!recipe_generation_prompt(&p, None, None).contains("Preferred cuisine"));

        p.cuisine_preferences = vec!["Italian".into()];
        assert!(recipe_generation_prompt(&p, None, None).contains("Preferred cuisine: Italian"));
    }

    #[test]
    fn test_recipe_prompt_dietary_segment_is_conditional() {
        let mut p = prefs();
        assert!(!recipe_generation_prompt(&p, None, None).contains("Dietary restrictions"));

        p.dietary_restrictions = vec!["Vegan".into(), "Nut-Free".into()];
        assert!(recipe_generation_prompt(&p, None, None)
            .contains("Dietary restrictions: Vegan, Nut-Free"));
    }

    #[test]
    fn test_recipe_prompt_includes_profiles() {
        let profile = user_profile();
        let ai = ai_profile();
        let prompt = recipe_generation_prompt(&prefs(), Some(&profile), Some(&ai));

        assert!(prompt.contains("Favorite cuisines: Thai, Korean"));
        assert!(prompt.contains("cilantro"));
        assert!(!prompt.contains("Health goals"));
        assert!(prompt.contains("Loves bold, spicy flavors"));
        assert!(prompt.contains("Craves soup"));
        assert!(!prompt.contains("Dietary summary"));
    }

    #[test]
    fn test_recipe_prompt_is_deterministic() {
        let p = prefs();
        assert_eq!(
            recipe_generation_prompt(&p, None, None),
            recipe_generation_prompt(&p, None, None)
        );
    }

    #[test]
    fn test_profile_prompt_sections() {
        let feedback = FeedbackEvent {
            rating: 5,
            liked_aspects: vec![LikedAspect::Taste, LikedAspect::MoodMatch],
            improvements: Some("less salt".into()),
            mood: Mood::Stressed,
        };
        let stats = HistoryStats {
            count: 3,
            average_rating: 4.333,
            top_aspects: vec![(LikedAspect::Taste, 3)],
        };
        let ai = ai_profile();
        let profile = user_profile();

        let prompt =
            profile_update_prompt("Pad Thai", &feedback, Some(&ai), &stats, Some(&profile));
        assert!(prompt.contains("Recipe: Pad Thai"));
        assert!(prompt.contains("Rating: 5/5"));
        assert!(prompt.contains("taste, mood-match"));
        assert!(prompt.contains("less salt"));
        assert!(prompt.contains("version 4"));
        assert!(prompt.contains("Average rating: 4.3/5"));
        assert!(prompt.contains("taste (3)"));
        assert!(prompt.contains("USER BACKGROUND"));
        assert!(prompt.contains("\"energy_patterns\""));
    }

    #[test]
    fn test_profile_prompt_without_optional_blocks() {
        let feedback = FeedbackEvent {
            rating: 2,
            liked_aspects: vec![],
            improvements: None,
            mood: Mood::Neutral,
        };
        let prompt = profile_update_prompt("Toast", &feedback, None, &HistoryStats::default(), None);

        assert!(prompt.contains("Liked aspects: none"));
        assert!(!prompt.contains("CURRENT PROFILE"));
        assert!(!prompt.contains("RECENT HISTORY"));
        assert!(!prompt.contains("USER BACKGROUND"));
    }

    #[test]
    fn test_regeneration_prompt_has_no_feedback_block() {
        let stats = HistoryStats {
            count: 2,
            average_rating: 4.5,
            top_aspects: vec![(LikedAspect::Quick, 2)],
        };
        let profile = user_profile();

        let prompt = profile_regeneration_prompt(None, &stats, Some(&profile));
        assert!(prompt.starts_with("Rebuild this user's cooking personality profile"));
        assert!(!prompt.contains("CURRENT FEEDBACK"));
        assert!(!prompt.contains("CURRENT PROFILE"));
        assert!(prompt.contains("RECENT HISTORY (2 ratings)"));
        assert!(prompt.contains("USER BACKGROUND"));
        assert!(prompt.contains("\"personality_profile\""));
    }
}
