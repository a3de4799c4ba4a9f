//! Turns free-form completion text into typed records.
//!
//! The model's reply is untrusted: every field is optional at this boundary
//! and alternate key spellings are mapped onto the canonical field before
//! defaults are applied.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{MoodchefError, Result};
use crate::intelligence::utils::{balanced_json_block, first_json_block};
use crate::models::{AiProfile, Difficulty, Nutrition, ProfileUpdate, Recipe};

const ID_KEYS: &[&str] = &["id", "recipeId", "recipe_id"];
const NAME_KEYS: &[&str] = &["name", "title", "recipeName", "recipe_name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "summary"];
const INGREDIENT_KEYS: &[&str] = &["ingredients", "ingredientList", "ingredient_list"];
const INSTRUCTION_KEYS: &[&str] = &["instructions", "steps", "directions", "method"];
const PREP_TIME_KEYS: &[&str] = &["prepTime", "prep_time", "preparationTime"];
const COOK_TIME_KEYS: &[&str] = &["cookTime", "cook_time", "cookingTime", "cooking_time"];
const TOTAL_TIME_KEYS: &[&str] = &["totalTime", "total_time"];
const SERVINGS_KEYS: &[&str] = &["servings", "serves", "yield"];
const DIFFICULTY_KEYS: &[&str] = &["difficulty", "difficultyLevel", "difficulty_level"];
const CUISINE_KEYS: &[&str] = &["cuisine", "cuisineType", "cuisine_type"];
const DIETARY_KEYS: &[&str] = &["dietaryInfo", "dietary_info", "dietaryTags", "dietary"];
const TAG_KEYS: &[&str] = &["tags", "keywords"];
const NUTRITION_KEYS: &[&str] = &[
    "nutrition",
    "nutritionalInfo",
    "nutritional_info",
    "nutritionInfo",
];

const PERSONALITY_KEYS: &[&str] = &["personality_profile", "personalityProfile"];
const DIETARY_SUMMARY_KEYS: &[&str] = &["dietary_summary", "dietarySummary"];
const MOOD_PREFERENCE_KEYS: &[&str] = &["mood_preferences", "moodPreferences"];
const ENERGY_PATTERN_KEYS: &[&str] = &["energy_patterns", "energyPatterns"];

/// Longest duration accepted for any recipe time, in minutes (one week).
const MAX_MINUTES: u32 = 7 * 24 * 60;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern is valid"));

static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d\s*(?:hours?|hrs?|h)\b|\b(?:hours?|hrs?)\b")
        .expect("hours pattern is valid")
});

/// Locate and parse the first JSON array or object embedded in `text`.
///
/// The greedy span (first opener to last closer) is tried first, then the
/// balanced span, so trailing bracketed prose does not sink an otherwise
/// valid reply.
pub fn extract_json(text: &str) -> Result<Value> {
    let greedy = first_json_block(text).ok_or_else(|| {
        MoodchefError::MalformedResponse("no JSON array or object found in response".to_string())
    })?;

    match serde_json::from_str(greedy) {
        Ok(value) => Ok(value),
        Err(greedy_error) => {
            let balanced = balanced_json_block(text).filter(|b| *b != greedy);
            if let Some(value) = balanced.and_then(|b| serde_json::from_str(b).ok()) {
                debug!("Recovered JSON using balanced bracket span");
                return Ok(value);
            }
            Err(MoodchefError::MalformedResponse(format!(
                "response JSON could not be parsed: {greedy_error}"
            )))
        }
    }
}

/// Parse a completion into recipes, one per element of the embedded array.
///
/// A lone object is treated as a one-element list, and an object wrapping a
/// `recipes` array is unwrapped.
pub fn parse_recipes(text: &str) -> Result<Vec<Recipe>> {
    let value = extract_json(text)?;

    let elements = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("recipes") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                map.insert("recipes".to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        other => {
            return Err(MoodchefError::MalformedResponse(format!(
                "expected a JSON array of recipes, found {}",
                json_kind(&other)
            )))
        }
    };

    Ok(elements.iter().map(normalize_recipe).collect())
}

/// Map one loosely-shaped recipe value onto a [`Recipe`]. Never fails.
pub fn normalize_recipe(value: &Value) -> Recipe {
    let empty = Map::new();
    let map = match value.as_object() {
        Some(map) => map,
        None => {
            warn!(kind = json_kind(value), "Recipe element is not an object, using defaults");
            &empty
        }
    };

    let prep_time = lookup(map, PREP_TIME_KEYS).map(coerce_minutes).unwrap_or(0);
    let cook_time = lookup(map, COOK_TIME_KEYS).map(coerce_minutes).unwrap_or(0);
    let total_time = lookup(map, TOTAL_TIME_KEYS)
        .filter(|v| !v.is_null())
        .map(coerce_minutes)
        .unwrap_or(prep_time.saturating_add(cook_time));

    Recipe {
        id: lookup(map, ID_KEYS)
            .map(coerce_string)
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        name: lookup(map, NAME_KEYS).map(coerce_string).unwrap_or_default(),
        description: lookup(map, DESCRIPTION_KEYS)
            .map(coerce_string)
            .unwrap_or_default(),
        ingredients: lookup(map, INGREDIENT_KEYS)
            .map(coerce_string_list)
            .unwrap_or_default(),
        instructions: lookup(map, INSTRUCTION_KEYS)
            .map(coerce_string_list)
            .unwrap_or_default(),
        prep_time,
        cook_time,
        total_time,
        servings: lookup(map, SERVINGS_KEYS).map(coerce_u32).unwrap_or(0),
        difficulty: lookup(map, DIFFICULTY_KEYS)
            .and_then(Value::as_str)
            .map(Difficulty::parse_lenient)
            .unwrap_or_default(),
        cuisine: lookup(map, CUISINE_KEYS).map(coerce_string).unwrap_or_default(),
        dietary_info: lookup(map, DIETARY_KEYS)
            .map(coerce_string_list)
            .unwrap_or_default(),
        tags: lookup(map, TAG_KEYS).map(coerce_string_list).unwrap_or_default(),
        nutrition: lookup(map, NUTRITION_KEYS).and_then(coerce_nutrition),
    }
}

/// Parse the four-field profile reply. Missing fields keep the value from
/// `current`, or become empty when there is no current profile.
pub fn parse_profile_update(text: &str, current: Option<&AiProfile>) -> Result<ProfileUpdate> {
    let value = extract_json(text)?;

    let map = match value {
        Value::Object(map) => map,
        Value::Array(mut items) if matches!(items.first(), Some(Value::Object(_))) => {
            match items.swap_remove(0) {
                Value::Object(map) => map,
                _ => Map::new(),
            }
        }
        other => {
            return Err(MoodchefError::MalformedResponse(format!(
                "expected a JSON object for profile update, found {}",
                json_kind(&other)
            )))
        }
    };

    let field = |keys: &[&str], fallback: Option<&String>| -> String {
        lookup(&map, keys)
            .map(coerce_string)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| fallback.cloned())
            .unwrap_or_default()
    };

    Ok(ProfileUpdate {
        personality_profile: field(PERSONALITY_KEYS, current.map(|p| &p.personality_profile)),
        dietary_summary: field(DIETARY_SUMMARY_KEYS, current.map(|p| &p.dietary_summary)),
        mood_preferences: field(MOOD_PREFERENCE_KEYS, current.map(|p| &p.mood_preferences)),
        energy_patterns: field(ENERGY_PATTERN_KEYS, current.map(|p| &p.energy_patterns)),
    })
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn coerce_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(obj) => ingredient_from_object(obj),
                other => coerce_string(other),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// `{"quantity": "1", "unit": "cup", "name": "rice"}` becomes `"1 cup rice"`.
fn ingredient_from_object(obj: &Map<String, Value>) -> String {
    const PARTS: &[&[&str]] = &[
        &["quantity", "amount", "qty"],
        &["unit"],
        &["name", "item", "ingredient", "text", "step", "description"],
    ];

    PARTS
        .iter()
        .filter_map(|keys| lookup(obj, keys).map(coerce_string))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => NUMBER_RE.find(s).and_then(|m| m.as_str().parse().ok()),
        _ => None,
    }
}

fn coerce_u32(value: &Value) -> u32 {
    coerce_number(value)
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n.round().min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

/// Numbers are minutes; strings like `"1 hour"` are converted. Results are
/// clamped to [`MAX_MINUTES`].
fn coerce_minutes(value: &Value) -> u32 {
    let minutes = match value {
        Value::String(s) if HOURS_RE.is_match(s) => coerce_number(value)
            .filter(|h| h.is_finite() && *h > 0.0)
            .map(|h| (h * 60.0).round().min(MAX_MINUTES as f64) as u32)
            .unwrap_or(0),
        _ => coerce_u32(value),
    };
    minutes.min(MAX_MINUTES)
}

fn coerce_nutrition(value: &Value) -> Option<Nutrition> {
    let map = value.as_object()?;
    let get = |keys: &[&str]| lookup(map, keys).map(coerce_u32).unwrap_or(0);

    Some(Nutrition {
        calories: get(&["calories", "kcal", "energy"]),
        protein: get(&["protein"]),
        carbs: get(&["carbs", "carbohydrates"]),
        fat: get(&["fat", "totalFat"]),
        fiber: get(&["fiber", "fibre"]),
    })
}
