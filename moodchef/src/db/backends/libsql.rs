use crate::db::connection::Database;
use crate::db::repository::{
    AiProfileRepository, DietaryRestrictionRepository, IntegrationRepository,
    RecipeHistoryRepository, SavedRecipeRepository, UserProfileRepository,
};
use crate::db::traits::{
    AiProfileStore, DatabaseBackend, DietaryRestrictionStore, IntegrationStore,
    RecipeHistoryStore, SavedRecipeStore, UserProfileStore,
};
use crate::error::Result;
use crate::models::{
    AiProfile, DietaryRestriction, IntegrationStatus, RecipeHistoryEntry, SavedRecipe, UserProfile,
};
use async_trait::async_trait;

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserProfileStore for LibSqlBackend {
    async fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let conn = self.db.connect()?;
        UserProfileRepository::get(&conn, user_id).await
    }
    async fn upsert_user_profile(&self, profile: &UserProfile) -> Result<()> {
        let conn = self.db.connect()?;
        UserProfileRepository::upsert(&conn, profile).await
    }
}

#[async_trait]
impl DietaryRestrictionStore for LibSqlBackend {
    async fn list_dietary_restrictions(&self, user_id: &str) -> Result<Vec<DietaryRestriction>> {
        let conn = self.db.connect()?;
        DietaryRestrictionRepository::list(&conn, user_id).await
    }
    async fn replace_dietary_restrictions(
        &self,
        user_id: &str,
        restrictions: &[DietaryRestriction],
    ) -> Result<()> {
        let conn = self.db.connect()?;
        DietaryRestrictionRepository::replace(&conn, user_id, restrictions).await
    }
}

#[async_trait]
impl AiProfileStore for LibSqlBackend {
    async fn get_ai_profile(&self, user_id: &str) -> Result<Option<AiProfile>> {
        let conn = self.db.connect()?;
        AiProfileRepository::get(&conn, user_id).await
    }
    async fn save_ai_profile(
        &self,
        profile: &AiProfile,
        expected_version: Option<u32>,
    ) -> Result<()> {
        let conn = self.db.connect()?;
        AiProfileRepository::save_versioned(&conn, profile, expected_version).await
    }
}

#[async_trait]
impl SavedRecipeStore for LibSqlBackend {
    async fn create_saved_recipe(&self, saved: &SavedRecipe) -> Result<()> {
        let conn = self.db.connect()?;
        SavedRecipeRepository::create(&conn, saved).await
    }
    async fn list_saved_recipes(&self, user_id: &str) -> Result<Vec<SavedRecipe>> {
        let conn = self.db.connect()?;
        SavedRecipeRepository::list(&conn, user_id).await
    }
    async fn increment_cooked_count(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<SavedRecipe>> {
        let conn = self.db.connect()?;
        SavedRecipeRepository::increment_cooked(&conn, user_id, id).await
    }
    async fn delete_saved_recipe(&self, user_id: &str, id: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        SavedRecipeRepository::delete(&conn, user_id, id).await
    }
}

#[async_trait]
impl RecipeHistoryStore for LibSqlBackend {
    async fn insert_history_entry(&self, entry: &RecipeHistoryEntry) -> Result<()> {
        let conn = self.db.connect()?;
        RecipeHistoryRepository::insert(&conn, entry).await
    }
    async fn recent_history(&self, user_id: &str, limit: u32) -> Result<Vec<RecipeHistoryEntry>> {
        let conn = self.db.connect()?;
        RecipeHistoryRepository::recent(&conn, user_id, limit).await
    }
}

#[async_trait]
impl IntegrationStore for LibSqlBackend {
    async fn list_integrations(&self, user_id: &str) -> Result<Vec<IntegrationStatus>> {
        let conn = self.db.connect()?;
        IntegrationRepository::list(&conn, user_id).await
    }
    async fn upsert_integration(&self, user_id: &str, status: &IntegrationStatus) -> Result<()> {
        let conn = self.db.connect()?;
        IntegrationRepository::upsert(&conn, user_id, status).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await
    }
}
