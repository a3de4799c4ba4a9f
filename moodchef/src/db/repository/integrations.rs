use chrono::Utc;
use libsql::{params, Connection};

use super::parse_timestamp;
use crate::error::Result;
use crate::models::{IntegrationStatus, IntegrationType};

pub struct IntegrationRepository;

impl IntegrationRepository {
    /// Stored rows only. Rows whose type is no longer recognized are skipped.
    pub async fn list(conn: &Connection, user_id: &str) -> Result<Vec<IntegrationStatus>> {
        let mut rows = conn
            .query(
                r#"
                SELECT integration_type, is_connected, last_synced, status_message
                FROM health_integrations_status
                WHERE user_id = ?1
                ORDER BY integration_type ASC
                "#,
                params![user_id],
            )
            .await?;

        let mut statuses = Vec::new();
        while let Some(row) = rows.next().await? {
            let raw_type: String = row.get(0)?;
            let Ok(integration_type) = raw_type.parse::<IntegrationType>() else {
                tracing::warn!(user_id, integration_type = %raw_type, "Skipping unknown integration type");
                continue;
            };

            statuses.push(IntegrationStatus {
                integration_type,
                is_connected: row.get::<i64>(1)? != 0,
                last_synced: row
                    .get::<Option<String>>(2)?
                    .map(|value| parse_timestamp(&value)),
                status_message: row.get(3)?,
            });
        }
        Ok(statuses)
    }

    pub async fn upsert(conn: &Connection, user_id: &str, status: &IntegrationStatus) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO health_integrations_status (
                user_id, integration_type, is_connected, last_synced, status_message, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_id, integration_type) DO UPDATE SET
                is_connected = excluded.is_connected,
                last_synced = excluded.last_synced,
                status_message = excluded.status_message,
                updated_at = excluded.updated_at
            "#,
            params![
                user_id,
                status.integration_type.as_str(),
                status.is_connected as i64,
                status.last_synced.map(|t| t.to_rfc3339()),
                status.status_message.clone(),
                Utc::now().to_rfc3339(),
            ],
        )
        .await?;
        Ok(())
    }
}
