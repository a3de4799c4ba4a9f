mod ai_profiles;
mod dietary_restrictions;
mod integrations;
mod recipe_history;
mod saved_recipes;
mod user_profiles;

pub use ai_profiles::AiProfileRepository;
pub use dietary_restrictions::DietaryRestrictionRepository;
pub use integrations::IntegrationRepository;
pub use recipe_history::RecipeHistoryRepository;
pub use saved_recipes::SavedRecipeRepository;
pub use user_profiles::UserProfileRepository;

use chrono::{DateTime, Utc};

/// Timestamps are stored as RFC 3339 text. Unparseable values read back as now.
pub(crate) fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
pub(crate) async fn test_connection() -> libsql::Connection {
    let conn = libsql::Builder::new_local(":memory:")
        .build()
        .await
        .unwrap()
        .connect()
        .unwrap();
    crate::db::schema::init_schema(&conn).await.unwrap();
    conn
}
