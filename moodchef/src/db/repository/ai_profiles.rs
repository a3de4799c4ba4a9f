use libsql::{params, Connection};

use super::parse_timestamp;
use crate::error::{MoodchefError, Result};
use crate::models::AiProfile;

pub struct AiProfileRepository;

impl AiProfileRepository {
    pub async fn get(conn: &Connection, user_id: &str) -> Result<Option<AiProfile>> {
        let mut rows = conn
            .query(
                r#"
                SELECT user_id, personality_profile, dietary_summary, mood_preferences,
                       energy_patterns, profile_strength, version, last_updated
                FROM ai_user_profiles WHERE user_id = ?1
                "#,
                params![user_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_profile(&row)?)),
            None => Ok(None),
        }
    }

    /// Compare-and-swap write keyed on `version`.
    ///
    /// With `expected_version = None` the row must not exist yet; otherwise the
    /// stored version must still equal `expected_version`. Zero affected rows
    /// means another writer won and yields [`MoodchefError::Conflict`].
    pub async fn save_versioned(
        conn: &Connection,
        profile: &AiProfile,
        expected_version: Option<u32>,
    ) -> Result<()> {
        let affected = match expected_version {
            None => {
                conn.execute(
                    r#"
                    INSERT INTO ai_user_profiles (
                        user_id, personality_profile, dietary_summary, mood_preferences,
                        energy_patterns, profile_strength, version, last_updated
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(user_id) DO NOTHING
                    "#,
                    params![
                        profile.user_id.clone(),
                        profile.personality_profile.clone(),
                        profile.dietary_summary.clone(),
                        profile.mood_preferences.clone(),
                        profile.energy_patterns.clone(),
                        profile.profile_strength as i64,
                        profile.version as i64,
                        profile.last_updated.to_rfc3339(),
                    ],
                )
                .await?
            }
            Some(expected) => {
                conn.execute(
                    r#"
                    UPDATE ai_user_profiles SET
                        personality_profile = ?2,
                        dietary_summary = ?3,
                        mood_preferences = ?4,
                        energy_patterns = ?5,
                        profile_strength = ?6,
                        version = ?7,
                        last_updated = ?8
                    WHERE user_id = ?1 AND version = ?9
                    "#,
                    params![
                        profile.user_id.clone(),
                        profile.personality_profile.clone(),
                        profile.dietary_summary.clone(),
                        profile.mood_preferences.clone(),
                        profile.energy_patterns.clone(),
                        profile.profile_strength as i64,
                        profile.version as i64,
                        profile.last_updated.to_rfc3339(),
                        expected as i64,
                    ],
                )
                .await?
            }
        };

        if affected == 0 {
            return Err(MoodchefError::Conflict(format!(
                "AI profile for {} changed concurrently (expected version {})",
                profile.user_id,
                expected_version.map_or_else(|| "none".to_string(), |v| v.to_string()),
            )));
        }

        Ok(())
    }

    fn row_to_profile(row: &libsql::Row) -> Result<AiProfile> {
        Ok(AiProfile {
            user_id: row.get(0)?,
            personality_profile: row.get(1)?,
            dietary_summary: row.get(2)?,
            mood_preferences: row.get(3)?,
            energy_patterns: row.get(4)?,
            profile_strength: row.get::<i64>(5)?.clamp(0, AiProfile::MAX_STRENGTH as i64) as u32,
            version: row.get::<i64>(6)?.max(0) as u32,
            last_updated: parse_timestamp(&row.get::<String>(7)?),
        })
    }
}
