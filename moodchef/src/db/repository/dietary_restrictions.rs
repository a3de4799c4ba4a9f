use chrono::Utc;
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::DietaryRestriction;

pub struct DietaryRestrictionRepository;

impl DietaryRestrictionRepository {
    pub async fn list(conn: &Connection, user_id: &str) -> Result<Vec<DietaryRestriction>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, user_id, restriction_type, severity
                FROM dietary_restrictions
                WHERE user_id = ?1
                ORDER BY created_at ASC, restriction_type ASC
                "#,
                params![user_id],
            )
            .await?;

        let mut restrictions = Vec::new();
        while let Some(row) = rows.next().await? {
            restrictions.push(DietaryRestriction {
                id: row.get(0)?,
                user_id: row.get(1)?,
                restriction_type: row.get(2)?,
                severity: row.get::<i64>(3)?.clamp(0, u8::MAX as i64) as u8,
            });
        }
        Ok(restrictions)
    }

    pub async fn delete_for_user(conn: &Connection, user_id: &str) -> Result<u64> {
        let deleted = conn
            .execute(
                "DELETE FROM dietary_restrictions WHERE user_id = ?1",
                params![user_id],
            )
            .await?;
        Ok(deleted)
    }

    pub async fn insert(conn: &Connection, restriction: &DietaryRestriction) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO dietary_restrictions (id, user_id, restriction_type, severity, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                restriction.id.clone(),
                restriction.user_id.clone(),
                restriction.restriction_type.clone(),
                restriction.severity as i64,
                Utc::now().to_rfc3339(),
            ],
        )
        .await?;
        Ok(())
    }

    /// Delete then insert, one statement at a time. A failure part way leaves
    /// whatever was written so far.
    pub async fn replace(
        conn: &Connection,
        user_id: &str,
        restrictions: &[DietaryRestriction],
    ) -> Result<()> {
        Self::delete_for_user(conn, user_id).await?;
        for restriction in restrictions {
            Self::insert(conn, restriction).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_connection;

    fn restriction(user_id: &str, kind: &str) -> DietaryRestriction {
        DietaryRestriction {
            id: nanoid::nanoid!(),
            user_id: user_id.into(),
            restriction_type: kind.into(),
            severity: 3,
        }
    }

    #[tokio::test]
    async fn test_replace_swaps_the_full_set() {
        let conn = test_connection().await;

        DietaryRestrictionRepository::replace(
            &conn,
            "u1",
            &[restriction("u1", "Vegetarian"), restriction("u1", "Nut-Free")],
        )
        .await
        .unwrap();
        assert_eq!(
            DietaryRestrictionRepository::list(&conn, "u1")
                .await
                .unwrap()
                .len(),
            2
        );

        DietaryRestrictionRepository::replace(&conn, "u1", &[restriction("u1", "Vegan")])
            .await
            .unwrap();
        let stored = DietaryRestrictionRepository::list(&conn, "u1").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].restriction_type, "Vegan");
        assert_eq!(stored[0].severity, 3);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let conn = test_connection().await;

        DietaryRestrictionRepository::insert(&conn, &restriction("u1", "Keto"))
            .await
            .unwrap();
        DietaryRestrictionRepository::insert(&conn, &restriction("u2", "Paleo"))
            .await
            .unwrap();

        let deleted = DietaryRestrictionRepository::delete_for_user(&conn, "u1")
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(
            DietaryRestrictionRepository::list(&conn, "u2")
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
