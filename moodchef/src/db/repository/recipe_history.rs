use libsql::{params, Connection};

use super::parse_timestamp;
use crate::error::Result;
use crate::models::{Mood, RecipeHistoryEntry};

pub struct RecipeHistoryRepository;

impl RecipeHistoryRepository {
    pub async fn insert(conn: &Connection, entry: &RecipeHistoryEntry) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO user_recipe_history (
                id, user_id, recipe_name, recipe_data, rating, liked_aspects,
                feedback_text, mood_at_rating, ai_profile_version_used, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                entry.id.clone(),
                entry.user_id.clone(),
                entry.recipe_name.clone(),
                serde_json::to_string(&entry.recipe)?,
                entry.rating as i64,
                serde_json::to_string(&entry.liked_aspects)?,
                entry.feedback_text.clone(),
                entry.mood_at_rating.as_str(),
                entry.ai_profile_version_used as i64,
                entry.created_at.to_rfc3339(),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn recent(
        conn: &Connection,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<RecipeHistoryEntry>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, user_id, recipe_name, recipe_data, rating, liked_aspects,
                       feedback_text, mood_at_rating, ai_profile_version_used, created_at
                FROM user_recipe_history
                WHERE user_id = ?1
                ORDER BY created_at DESC, rowid DESC
                LIMIT ?2
                "#,
                params![user_id, limit as i64],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(Self::row_to_entry(&row)?);
        }
        Ok(entries)
    }

    fn row_to_entry(row: &libsql::Row) -> Result<RecipeHistoryEntry> {
        Ok(RecipeHistoryEntry {
            id: row.get(0)?,
            user_id: row.get(1)?,
            recipe_name: row.get(2)?,
            recipe: serde_json::from_str(&row.get::<String>(3)?).unwrap_or_default(),
            rating: row.get::<i64>(4)?.clamp(0, 5) as u8,
            liked_aspects: serde_json::from_str(&row.get::<String>(5)?).unwrap_or_default(),
            feedback_text: row.get(6)?,
            mood_at_rating: row.get::<String>(7)?.parse().unwrap_or(Mood::Neutral),
            ai_profile_version_used: row.get::<i64>(8)?.max(0) as u32,
            created_at: parse_timestamp(&row.get::<String>(9)?),
        })
    }
}
