use std::collections::HashMap;

use crate::models::{LikedAspect, RecipeHistoryEntry};

const TOP_ASPECTS: usize = 5;

/// Aggregates over a user's recent ratings, fed into the profile update prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStats {
    pub count: usize,
    pub average_rating: f64,
    /// Most frequent liked aspects, highest count first. Ties are ordered by name.
    pub top_aspects: Vec<(LikedAspect, usize)>,
}

impl HistoryStats {
    pub fn from_history(history: &[RecipeHistoryEntry]) -> Self {
        if history.is_empty() {
            return Self::default();
        }

        let total: u32 = history.iter().map(|entry| entry.rating as u32).sum();

        let mut counts: HashMap<LikedAspect, usize> = HashMap::new();
        for aspect in history.iter().flat_map(|entry| entry.liked_aspects.iter()) {
            *counts.entry(*aspect).or_default() += 1;
        }

        let mut top_aspects: Vec<(LikedAspect, usize)> = counts.into_iter().collect();
        top_aspects.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        top_aspects.truncate(TOP_ASPECTS);

        Self {
            count: history.len(),
            average_rating: total as f64 / history.len() as f64,
            top_aspects,
        }
    }
}

/// Slice out the first bracketed JSON value: from the first `[` or `{` to the
/// last matching closer. Returns `None` when no such span exists.
pub fn first_json_block(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let closer = match text.as_bytes()[start] {
        b'[' => ']',
        _ => '}',
    };
    let end = text.rfind(closer)?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Like [`first_json_block`] but stops at the closer that balances the first
/// opener, ignoring brackets inside string literals.
pub fn balanced_json_block(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;
    use chrono::Utc;

    fn entry(rating: u8, aspects: &[LikedAspect]) -> RecipeHistoryEntry {
        RecipeHistoryEntry {
            id: nanoid::nanoid!(),
            user_id: "u1".into(),
            recipe_name: "Dish".into(),
            recipe: serde_json::json!({}),
            rating,
            liked_aspects: aspects.to_vec(),
            feedback_text: None,
            mood_at_rating: Mood::Neutral,
            ai_profile_version_used: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_history_yields_defaults() {
        assert_eq!(HistoryStats::from_history(&[]), HistoryStats::default());
    }

    #[test]
    fn stats_average_and_rank_aspects() {
        use LikedAspect::*;
        let history = vec![
            entry(5, &[Taste, Quick]),
            entry(4, &[Taste, Healthy]),
            entry(3, &[Taste, Quick, Filling]),
        ];

        let stats = HistoryStats::from_history(&history);
        assert_eq!(stats.count, 3);
        assert!((stats.average_rating - 4.0).abs() < f64::EPSILON);
        assert_eq!(stats.top_aspects[0], (Taste, 3));
        assert_eq!(stats.top_aspects[1], (Quick, 2));
        // filling and healthy tie at one, ordered by name
        assert_eq!(stats.top_aspects[2], (Filling, 1));
        assert_eq!(stats.top_aspects[3], (Healthy, 1));
    }

    #[test]
    fn stats_keep_only_top_five() {
        use LikedAspect::*;
        let history = vec![entry(
            4,
            &[Taste, Easy, Healthy, Quick, Filling, Ingredients, Presentation],
        )];
        assert_eq!(HistoryStats::from_history(&history).top_aspects.len(), 5);
    }

    #[test]
    fn json_block_is_greedy() {
        let text = "Here you go: [{\"a\": [1]}] Enjoy [cooking]";
        assert_eq!(
            first_json_block(text),
            Some("[{\"a\": [1]}] Enjoy [cooking]")
        );
        assert_eq!(balanced_json_block(text), Some("[{\"a\": [1]}]"));
    }

    #[test]
    fn balanced_block_skips_brackets_in_strings() {
        let text = r#"{"note": "use [optional] herbs", "n": 1} trailing }"#;
        assert_eq!(
            balanced_json_block(text),
            Some(r#"{"note": "use [optional] herbs", "n": 1}"#)
        );
        assert_eq!(balanced_json_block("[1, 2"), None);
    }

    #[test]
    fn json_block_object_and_missing() {
        assert_eq!(first_json_block("x {\"k\": 1} y"), Some("{\"k\": 1}"));
        assert_eq!(first_json_block("no json here"), None);
        assert_eq!(first_json_block("broken ] then ["), None);
    }
}
