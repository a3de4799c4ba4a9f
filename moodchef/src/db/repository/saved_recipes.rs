use libsql::{params, Connection};

use super::parse_timestamp;
use crate::error::Result;
use crate::models::SavedRecipe;

pub struct SavedRecipeRepository;

impl SavedRecipeRepository {
    pub async fn create(conn: &Connection, saved: &SavedRecipe) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO saved_recipes (id, user_id, recipe_name, recipe_data, cooked_count, saved_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                saved.id.clone(),
                saved.user_id.clone(),
                saved.recipe_name.clone(),
                serde_json::to_string(&saved.recipe)?,
                saved.cooked_count as i64,
                saved.saved_at.to_rfc3339(),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn get(conn: &Connection, user_id: &str, id: &str) -> Result<Option<SavedRecipe>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, user_id, recipe_name, recipe_data, cooked_count, saved_at
                FROM saved_recipes WHERE id = ?1 AND user_id = ?2
                "#,
                params![id, user_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_saved(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list(conn: &Connection, user_id: &str) -> Result<Vec<SavedRecipe>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, user_id, recipe_name, recipe_data, cooked_count, saved_at
                FROM saved_recipes
                WHERE user_id = ?1
                ORDER BY saved_at DESC, rowid DESC
                "#,
                params![user_id],
            )
            .await?;

        let mut saved = Vec::new();
        while let Some(row) = rows.next().await? {
            saved.push(Self::row_to_saved(&row)?);
        }
        Ok(saved)
    }

    pub async fn increment_cooked(
        conn: &Connection,
        user_id: &str,
        id: &str,
    ) -> Result<Option<SavedRecipe>> {
        let updated = conn
            .execute(
                "UPDATE saved_recipes SET cooked_count = cooked_count + 1 WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .await?;

        if updated == 0 {
            return Ok(None);
        }
        Self::get(conn, user_id, id).await
    }

    pub async fn delete(conn: &Connection, user_id: &str, id: &str) -> Result<bool> {
        let deleted = conn
            .execute(
                "DELETE FROM saved_recipes WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )
            .await?;
        Ok(deleted > 0)
    }

    fn row_to_saved(row: &libsql::Row) -> Result<SavedRecipe> {
        Ok(SavedRecipe {
            id: row.get(0)?,
            user_id: row.get(1)?,
            recipe_name: row.get(2)?,
            recipe: serde_json::from_str(&row.get::<String>(3)?).unwrap_or_default(),
            cooked_count: row.get::<i64>(4)?.max(0) as u32,
            saved_at: parse_timestamp(&row.get::<String>(5)?),
        })
    }
}
