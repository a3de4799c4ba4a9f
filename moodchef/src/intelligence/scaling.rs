//! Serving-size scaling for ingredient text and nutrition.
//!
//! Quantities are rendered the way a cook would write them: snapped to a
//! common fraction when one is close, otherwise one decimal place.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MoodchefError, Result};
use crate::models::{Nutrition, Recipe};

/// Below this scaled amount the quantity is rendered as "pinch".
const PINCH_THRESHOLD: f64 = 0.2;
/// Maximum distance to a table fraction for it to be used.
const FRACTION_TOLERANCE: f64 = 0.05;

const FRACTIONS: &[(f64, &str)] = &[
    (0.125, "1/8"),
    (0.25, "1/4"),
    (1.0 / 3.0, "1/3"),
    (0.375, "3/8"),
    (0.5, "1/2"),
    (0.625, "5/8"),
    (2.0 / 3.0, "2/3"),
    (0.75, "3/4"),
    (0.875, "7/8"),
];

const VULGAR_FRACTIONS: &[(char, f64)] = &[
    ('⅛', 0.125),
    ('¼', 0.25),
    ('⅓', 1.0 / 3.0),
    ('⅜', 0.375),
    ('½', 0.5),
    ('⅝', 0.625),
    ('⅔', 2.0 / 3.0),
    ('¾', 0.75),
    ('⅞', 0.875),
];

// Alternatives are tried in order: mixed number, simple fraction, number with
// optional glyph ("1½"), lone glyph. The quantity must be followed by whitespace.
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<mw>\d+)\s+(?P<mn>\d+)/(?P<md>\d+)|(?P<fn>\d+)/(?P<fd>\d+)|(?P<num>\d*\.\d+|\d+)(?P<ng>[⅛¼⅓⅜½⅝⅔¾⅞])?|(?P<glyph>[⅛¼⅓⅜½⅝⅔¾⅞]))\s+",
    )
    .expect("quantity pattern is valid")
});

/// Scale the leading quantity of `ingredient` by `ratio`.
///
/// Strings without a leading quantity are returned unchanged.
///
/// ```
/// use moodchef::intelligence::scaling::scale_ingredient;
///
/// assert_eq!(scale_ingredient("1/2 cup sugar", 2.0), "1 cup sugar");
/// assert_eq!(scale_ingredient("salt to taste", 3.0), "salt to taste");
/// ```
pub fn scale_ingredient(ingredient: &str, ratio: f64) -> String {
    let trimmed = ingredient.trim_start();

    let Some(captures) = QUANTITY_RE.captures(trimmed) else {
        return ingredient.to_string();
    };
    let Some(quantity) = quantity_from_captures(&captures) else {
        return ingredient.to_string();
    };

    let matched_len = captures.get(0).map(|m| m.end()).unwrap_or(0);
    let rest = &trimmed[matched_len..];

    format!("{} {}", render_quantity(quantity * ratio), rest)
}

fn quantity_from_captures(captures: &regex::Captures<'_>) -> Option<f64> {
    let number = |name: &str| -> Option<f64> { captures.name(name)?.as_str().parse().ok() };

    if let (Some(whole), Some(num), Some(den)) = (number("mw"), number("mn"), number("md")) {
        return (den != 0.0).then(|| whole + num / den);
    }
    if let (Some(num), Some(den)) = (number("fn"), number("fd")) {
        return (den != 0.0).then(|| num / den);
    }
    if let Some(value) = number("num") {
        let glyph = captures
            .name("ng")
            .and_then(|m| m.as_str().chars().next())
            .and_then(vulgar_value)
            .unwrap_or(0.0);
        return Some(value + glyph);
    }
    captures
        .name("glyph")
        .and_then(|m| m.as_str().chars().next())
        .and_then(vulgar_value)
}

fn vulgar_value(glyph: char) -> Option<f64> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(c, _)| *c == glyph)
        .map(|(_, value)| *value)
}

fn nearest_fraction(value: f64) -> Option<&'static str> {
    FRACTIONS
        .iter()
        .map(|(decimal, label)| ((value - decimal).abs(), *label))
        .filter(|(distance, _)| *distance < FRACTION_TOLERANCE)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, label)| label)
}

/// Render a scaled quantity for display.
pub fn render_quantity(value: f64) -> String {
    if value < PINCH_THRESHOLD {
        return "pinch".to_string();
    }

    if value >= 1.0 {
        let whole = value.floor();
        let fraction = value - whole;

        if fraction < 0.1 {
            return format!("{}", whole as u64);
        }
        if fraction >= 0.9 {
            return format!("{}", whole as u64 + 1);
        }
        return match nearest_fraction(fraction) {
            Some(label) => format!("{} {}", whole as u64, label),
            None => format!("{value:.1}"),
        };
    }

    match nearest_fraction(value) {
        Some(label) => label.to_string(),
        None => format!("{value:.1}"),
    }
}

/// Multiply every nutrition field by `ratio`, rounding to the nearest integer.
pub fn scale_nutrition(nutrition: &Nutrition, ratio: f64) -> Nutrition {
    let scale = |v: u32| (v as f64 * ratio).round().max(0.0) as u32;
    Nutrition {
        calories: scale(nutrition.calories),
        protein: scale(nutrition.protein),
        carbs: scale(nutrition.carbs),
        fat: scale(nutrition.fat),
        fiber: scale(nutrition.fiber),
    }
}

/// Target servings divided by the recipe's own servings.
pub fn serving_ratio(original: u32, target: u32) -> Result<f64> {
    if original == 0 {
        return Err(MoodchefError::Validation(
            "Recipe has no serving count to scale from".to_string(),
        ));
    }
    if target == 0 {
        return Err(MoodchefError::Validation(
            "Target servings must be at least 1".to_string(),
        ));
    }
    Ok(target as f64 / original as f64)
}

/// Produce a copy of `recipe` sized for `target_servings`.
pub fn scale_recipe(recipe: &Recipe, target_servings: u32) -> Result<Recipe> {
    let ratio = serving_ratio(recipe.servings, target_servings)?;

    Ok(Recipe {
        ingredients: recipe
            .ingredients
            .iter()
            .map(|ingredient| scale_ingredient(ingredient, ratio))
            .collect(),
        nutrition: recipe.nutrition.map(|n| scale_nutrition(&n, ratio)),
        servings: target_servings,
        ..recipe.clone()
    })
}
