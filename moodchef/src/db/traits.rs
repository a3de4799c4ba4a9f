use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AiProfile, DietaryRestriction, IntegrationStatus, RecipeHistoryEntry, SavedRecipe, UserProfile,
};

// ---------------------------------------------------------------------------
// Individual store traits
// ---------------------------------------------------------------------------

/// Onboarding questionnaire rows.
#[async_trait]
pub trait UserProfileStore: Send + Sync {
    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>>;
    async fn upsert_user_profile(&self, profile: &UserProfile) -> Result<()>;
}

#[async_trait]
pub trait DietaryRestrictionStore: Send + Sync {
    async fn list_dietary_restrictions(&self, user_id: &str) -> Result<Vec<DietaryRestriction>>;

    /// Delete every restriction for the user, then insert `restrictions`.
    /// The two steps are not atomic.
    async fn replace_dietary_restrictions(
        &self,
        user_id: &str,
        restrictions: &[DietaryRestriction],
    ) -> Result<()>;
}

/// Versioned AI profile storage.
#[async_trait]
pub trait AiProfileStore: Send + Sync {
    async fn get_ai_profile(&self, user_id: &str) -> Result<Option<AiProfile>>;

    /// Persist `profile` only if the stored version still equals
    /// `expected_version` (`None` meaning no row exists yet). Returns
    /// [`crate::error::MoodchefError::Conflict`] when another writer got there first.
    async fn save_ai_profile(&self, profile: &AiProfile, expected_version: Option<u32>)
        -> Result<()>;
}

#[async_trait]
pub trait SavedRecipeStore: Send + Sync {
    async fn create_saved_recipe(&self, saved: &SavedRecipe) -> Result<()>;
    /// Newest first.
    async fn list_saved_recipes(&self, user_id: &str) -> Result<Vec<SavedRecipe>>;
    /// Returns the updated row, or `None` if it does not belong to the user.
    async fn increment_cooked_count(&self, user_id: &str, id: &str)
        -> Result<Option<SavedRecipe>>;
    async fn delete_saved_recipe(&self, user_id: &str, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait RecipeHistoryStore: Send + Sync {
    async fn insert_history_entry(&self, entry: &RecipeHistoryEntry) -> Result<()>;
    /// Most recent entries first, at most `limit`.
    async fn recent_history(&self, user_id: &str, limit: u32) -> Result<Vec<RecipeHistoryEntry>>;
}

#[async_trait]
pub trait IntegrationStore: Send + Sync {
    async fn list_integrations(&self, user_id: &str) -> Result<Vec<IntegrationStatus>>;
    async fn upsert_integration(&self, user_id: &str, status: &IntegrationStatus) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Unified backend supertrait
// ---------------------------------------------------------------------------

/// A complete database backend that combines all store traits plus lifecycle
/// operations.
#[async_trait]
pub trait DatabaseBackend:
    UserProfileStore
    + DietaryRestrictionStore
    + AiProfileStore
    + SavedRecipeStore
    + RecipeHistoryStore
    + IntegrationStore
{
    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;

    /// Cheap liveness probe.
    async fn ping(&self) -> Result<()>;
}
