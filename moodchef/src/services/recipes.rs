use std::sync::Arc;

use chrono::Utc;
use nanoid::nanoid;
use validator::Validate;

use crate::db::DatabaseBackend;
use crate::error::{MoodchefError, Result};
use crate::intelligence::parser::parse_recipes;
use crate::intelligence::scaling::scale_recipe;
use crate::llm::prompts::recipe_generation_prompt;
use crate::llm::LlmProvider;
use crate::models::{AiProfile, Recipe, RecipePreferences, SavedRecipe, UserProfile};

const SYSTEM_PROMPT: &str = "You are a creative chef who writes practical home recipes. \
     Respond with a JSON array of recipes and nothing else.";

/// Recipe generation plus the saved-recipe collection.
#[derive(Clone)]
pub struct RecipeService {
    db: Arc<dyn DatabaseBackend>,
    llm: LlmProvider,
}

impl RecipeService {
    pub fn new(db: Arc<dyn DatabaseBackend>, llm: LlmProvider) -> Self {
        Self { db, llm }
    }

    /// Build a prompt from the search and whatever profiles exist, ask the
    /// model, and normalize its reply. Profile lookups are optional context:
    /// a failed read degrades the prompt instead of failing the search.
    pub async fn generate(&self, user_id: &str, prefs: &RecipePreferences) -> Result<Vec<Recipe>> {
        prefs.validate()?;

        let (user_profile, ai_profile) = self.load_context(user_id).await;
        let prompt = recipe_generation_prompt(prefs, user_profile.as_ref(), ai_profile.as_ref());

        let response = self
            .llm
            .complete_with_system(&prompt, Some(SYSTEM_PROMPT), None)
            .await?;

        let mut recipes = parse_recipes(&response)?;
        for recipe in &mut recipes {
            if recipe.servings == 0 {
                recipe.servings = prefs.servings;
            }
        }

        tracing::info!(
            user_id,
            count = recipes.len(),
            personalized = ai_profile.is_some(),
            "Generated recipes"
        );
        Ok(recipes)
    }

    async fn load_context(&self, user_id: &str) -> (Option<UserProfile>, Option<AiProfile>) {
        let user_profile = match self.db.get_user_profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, user_id, "Failed to load user profile for prompt");
                None
            }
        };
        let ai_profile = match self.db.get_ai_profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, user_id, "Failed to load AI profile for prompt");
                None
            }
        };
        (user_profile, ai_profile)
    }

    pub fn scale(&self, recipe: &Recipe, target_servings: u32) -> Result<Recipe> {
        scale_recipe(recipe, target_servings)
    }

    /// Store the recipe body verbatim. The display name is taken from
    /// `name`, falling back to `title`.
    pub async fn save(&self, user_id: &str, recipe: serde_json::Value) -> Result<SavedRecipe> {
        let recipe_name = ["name", "title"]
            .iter()
            .find_map(|key| recipe.get(*key).and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| MoodchefError::Validation("Recipe must have a name".to_string()))?
            .to_string();

        let saved = SavedRecipe {
            id: nanoid!(),
            user_id: user_id.to_string(),
            recipe_name,
            recipe,
            cooked_count: 0,
            saved_at: Utc::now(),
        };
        self.db.create_saved_recipe(&saved).await?;

        tracing::debug!(user_id, saved_id = %saved.id, "Saved recipe");
        Ok(saved)
    }

    pub async fn list_saved(&self, user_id: &str) -> Result<Vec<SavedRecipe>> {
        self.db.list_saved_recipes(user_id).await
    }

    pub async fn mark_cooked(&self, user_id: &str, saved_id: &str) -> Result<SavedRecipe> {
        self.db
            .increment_cooked_count(user_id, saved_id)
            .await?
            .ok_or_else(|| MoodchefError::NotFound(format!("Saved recipe {saved_id} not found")))
    }

    pub async fn remove_saved(&self, user_id: &str, saved_id: &str) -> Result<()> {
        if self.db.delete_saved_recipe(user_id, saved_id).await? {
            Ok(())
        } else {
            Err(MoodchefError::NotFound(format!(
                "Saved recipe {saved_id} not found"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, LlmConfig};
    use crate::db::{Database, LibSqlBackend};
    use crate::models::{EnergyLevel, Mood};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn test_db() -> (Arc<dyn DatabaseBackend>, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("file:{}", temp_dir.path().join("recipes.db").display()),
            auth_token: None,
            local_path: None,
        };
        let db = Database::new(&config).await.unwrap();
        (Arc::new(LibSqlBackend::new(db)), temp_dir)
    }

    fn test_llm_provider(base_url: String) -> LlmProvider {
        LlmProvider::new(&LlmConfig {
            model: "openai/gpt-4o-mini".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: Some(base_url),
            timeout_secs: 5,
            max_retries: 0,
            ..LlmConfig::default()
        })
    }

    fn llm_response(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    fn prefs() -> RecipePreferences {
        RecipePreferences {
            ingredients: vec!["chicken".into(), "rice".into()],
            dietary_restrictions: vec![],
            cuisine_preferences: vec![],
            mood_level: Mood::Happy,
            energy_level: EnergyLevel::Medium,
            cooking_time: 30,
            servings: 2,
        }
    }

    #[tokio::test]
    async fn generate_fills_missing_servings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("chicken, rice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(llm_response(
                r#"Here are your recipes: [{"name": "Chicken Rice Bowl", "prepTime": 10, "cookTime": 15}]"#,
            )))
            .mount(&server)
            .await;

        let (db, _dir) = test_db().await;
        let service = RecipeService::new(db, test_llm_provider(server.uri()));
        let recipes = service.generate("u1", &prefs()).await.unwrap();

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Chicken Rice Bowl");
        assert_eq!(recipes[0].servings, 2);
        assert_eq!(recipes[0].total_time, 25);
    }

    #[tokio::test]
    async fn generate_rejects_empty_ingredients() {
        let (db, _dir) = test_db().await;
        let service = RecipeService::new(db, LlmProvider::unavailable("unused"));
        let mut p = prefs();
        p.ingredients.clear();

        let result = service.generate("u1", &p).await;
        assert!(matches!(result, Err(MoodchefError::Validation(_))));
    }

    #[tokio::test]
    async fn generate_without_llm_is_configuration_error() {
        let (db, _dir) = test_db().await;
        let service = RecipeService::new(db, LlmProvider::unavailable("no key"));

        let result = service.generate("u1", &prefs()).await;
        assert!(matches!(result, Err(MoodchefError::Configuration(_))));
    }

    #[tokio::test]
    async fn saved_recipe_lifecycle() {
        let (db, _dir) = test_db().await;
        let service = RecipeService::new(db, LlmProvider::unavailable("unused"));

        let saved = service
            .save("u1", json!({"title": "Shakshuka", "servings": 2}))
            .await
            .unwrap();
        assert_eq!(saved.recipe_name, "Shakshuka");

        let cooked = service.mark_cooked("u1", &saved.id).await.unwrap();
        assert_eq!(cooked.cooked_count, 1);

        assert_eq!(service.list_saved("u1").await.unwrap().len(), 1);
        service.remove_saved("u1", &saved.id).await.unwrap();
        assert!(matches!(
            service.remove_saved("u1", &saved.id).await,
            Err(MoodchefError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn save_requires_a_name() {
        let (db, _dir) = test_db().await;
        let service = RecipeService::new(db, LlmProvider::unavailable("unused"));

        let result = service.save("u1", json!({"servings": 2})).await;
        assert!(matches!(result, Err(MoodchefError::Validation(_))));
    }
}
