use libsql::{params, Connection};

use super::parse_timestamp;
use crate::error::Result;
use crate::models::UserProfile;

pub struct UserProfileRepository;

impl UserProfileRepository {
    pub async fn get(conn: &Connection, user_id: &str) -> Result<Option<UserProfile>> {
        let mut rows = conn
            .query(
                r#"
                SELECT user_id, name, age_range, gender, ethnicity, cuisine_preferences,
                       disliked_foods, health_goals, cooking_skill, updated_at
                FROM user_profiles WHERE user_id = ?1
                "#,
                params![user_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_profile(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn upsert(conn: &Connection, profile: &UserProfile) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO user_profiles (
                user_id, name, age_range, gender, ethnicity, cuisine_preferences,
                disliked_foods, health_goals, cooking_skill, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                age_range = excluded.age_range,
                gender = excluded.gender,
                ethnicity = excluded.ethnicity,
                cuisine_preferences = excluded.cuisine_preferences,
                disliked_foods = excluded.disliked_foods,
                health_goals = excluded.health_goals,
                cooking_skill = excluded.cooking_skill,
                updated_at = excluded.updated_at
            "#,
            params![
                profile.user_id.clone(),
                profile.name.clone(),
                profile.age_range.clone(),
                profile.gender.clone(),
                profile.ethnicity.clone(),
                serde_json::to_string(&profile.cuisine_preferences)?,
                serde_json::to_string(&profile.disliked_foods)?,
                serde_json::to_string(&profile.health_goals)?,
                profile.cooking_skill.clone(),
                profile.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    fn row_to_profile(row: &libsql::Row) -> Result<UserProfile> {
        Ok(UserProfile {
            user_id: row.get(0)?,
            name: row.get(1)?,
            age_range: row.get(2)?,
            gender: row.get(3)?,
            ethnicity: row.get(4)?,
            cuisine_preferences: serde_json::from_str(&row.get::<String>(5)?).unwrap_or_default(),
            disliked_foods: serde_json::from_str(&row.get::<String>(6)?).unwrap_or_default(),
            health_goals: serde_json::from_str(&row.get::<String>(7)?).unwrap_or_default(),
            cooking_skill: row.get(8)?,
            updated_at: parse_timestamp(&row.get::<String>(9)?),
        })
    }
}
