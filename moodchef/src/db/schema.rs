use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Onboarding questionnaire, one row per user
        CREATE TABLE IF NOT EXISTS user_profiles (
            user_id TEXT PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            age_range TEXT NOT NULL DEFAULT '',
            gender TEXT NOT NULL DEFAULT '',
            ethnicity TEXT NOT NULL DEFAULT '',
            cuisine_preferences TEXT NOT NULL DEFAULT '[]',
            disliked_foods TEXT NOT NULL DEFAULT '[]',
            health_goals TEXT NOT NULL DEFAULT '{}',
            cooking_skill TEXT,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS dietary_restrictions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            restriction_type TEXT NOT NULL,
            severity INTEGER NOT NULL DEFAULT 3,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_dietary_restrictions_user ON dietary_restrictions(user_id);

        -- Model-maintained profile; version is the compare-and-swap token
        CREATE TABLE IF NOT EXISTS ai_user_profiles (
            user_id TEXT PRIMARY KEY,
            personality_profile TEXT NOT NULL DEFAULT '',
            dietary_summary TEXT NOT NULL DEFAULT '',
            mood_preferences TEXT NOT NULL DEFAULT '',
            energy_patterns TEXT NOT NULL DEFAULT '',
            profile_strength INTEGER NOT NULL DEFAULT 0,
            version INTEGER NOT NULL DEFAULT 1,
            last_updated TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS saved_recipes (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            recipe_name TEXT NOT NULL,
            recipe_data TEXT NOT NULL DEFAULT '{}',
            cooked_count INTEGER NOT NULL DEFAULT 0,
            saved_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_saved_recipes_user ON saved_recipes(user_id, saved_at);

        CREATE TABLE IF NOT EXISTS user_recipe_history (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            recipe_name TEXT NOT NULL,
            recipe_data TEXT NOT NULL DEFAULT '{}',
            rating INTEGER NOT NULL,
            liked_aspects TEXT NOT NULL DEFAULT '[]',
            feedback_text TEXT,
            mood_at_rating TEXT NOT NULL DEFAULT 'neutral',
            ai_profile_version_used INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_recipe_history_user ON user_recipe_history(user_id, created_at);

        CREATE TABLE IF NOT EXISTS health_integrations_status (
            user_id TEXT NOT NULL,
            integration_type TEXT NOT NULL,
            is_connected INTEGER NOT NULL DEFAULT 0,
            last_synced TEXT,
            status_message TEXT,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_id, integration_type)
        );
        "#,
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libsql::Builder;

    async fn table_names(conn: &Connection) -> Vec<String> {
        let mut rows = conn
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                (),
            )
            .await
            .unwrap();
        let mut names = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            names.push(row.get::<String>(0).unwrap());
        }
        names
    }

    #[tokio::test]
    async fn test_schema_creates_all_tables() {
        let db = Builder::new_local(":memory:").build().await.unwrap();
        let conn = db.connect().unwrap();

        init_schema(&conn).await.unwrap();

        assert_eq!(
            table_names(&conn).await,
            vec![
                "ai_user_profiles",
                "dietary_restrictions",
                "health_integrations_status",
                "saved_recipes",
                "user_profiles",
                "user_recipe_history",
            ]
        );
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let db = Builder::new_local(":memory:").build().await.unwrap();
        let conn = db.connect().unwrap();

        init_schema(&conn).await.unwrap();
        init_schema(&conn).await.unwrap();

        assert_eq!(table_names(&conn).await.len(), 6);
    }
}
