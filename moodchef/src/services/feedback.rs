use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use nanoid::nanoid;
use validator::Validate;

use crate::db::DatabaseBackend;
use crate::error::{MoodchefError, Result};
use crate::intelligence::{CompositionInput, ProfileComposer};
use crate::models::{AiProfile, FeedbackEvent, RecipeHistoryEntry, UserProfile};

/// Version recorded on a history row when the user has no AI profile yet.
const DEFAULT_PROFILE_VERSION: u32 = 1;

/// One async mutex per user id, created on first use and dropped again once
/// no task holds or waits on it.
#[derive(Default, Clone)]
struct UserLocks {
    inner: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl UserLocks {
    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<tokio::sync::Mutex<()>>>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn get(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.map().entry(user_id.to_string()).or_default().clone()
    }

    /// Call after dropping the handle returned by [`UserLocks::get`].
    fn release(&self, user_id: &str) {
        let mut locks = self.map();
        if locks
            .get(user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(user_id);
        }
    }
}

type ProfileContext = (Option<AiProfile>, Vec<RecipeHistoryEntry>, Option<UserProfile>);

/// What a feedback submission produced. `ai_profile` is `None` when the
/// profile update was skipped or failed; the rating is stored either way.
#[derive(Debug, Clone)]
pub struct FeedbackOutcome {
    pub history_entry: RecipeHistoryEntry,
    pub ai_profile: Option<AiProfile>,
}

/// Records ratings and evolves the AI profile from them.
#[derive(Clone)]
pub struct FeedbackService {
    db: Arc<dyn DatabaseBackend>,
    composer: ProfileComposer,
    locks: UserLocks,
    history_limit: u32,
}

impl FeedbackService {
    pub fn new(db: Arc<dyn DatabaseBackend>, composer: ProfileComposer, history_limit: u32) -> Self {
        Self {
            db,
            composer,
            locks: UserLocks::default(),
            history_limit,
        }
    }

    /// Store the rating, then try to update the AI profile.
    ///
    /// Only the history insert can fail the call. Any error from the profile
    /// update, including a lost version race, is logged and dropped.
    pub async fn submit(
        &self,
        user_id: &str,
        recipe_name: &str,
        recipe: serde_json::Value,
        feedback: &FeedbackEvent,
    ) -> Result<FeedbackOutcome> {
        feedback.validate()?;
        if recipe_name.trim().is_empty() {
            return Err(MoodchefError::Validation(
                "recipeName must not be empty".to_string(),
            ));
        }

        let version_used = match self.db.get_ai_profile(user_id).await {
            Ok(profile) => profile.map_or(DEFAULT_PROFILE_VERSION, |p| p.version),
            Err(e) => {
                tracing::warn!(error = %e, user_id, "Failed to read AI profile version");
                DEFAULT_PROFILE_VERSION
            }
        };

        let entry = RecipeHistoryEntry {
            id: nanoid!(),
            user_id: user_id.to_string(),
            recipe_name: recipe_name.trim().to_string(),
            recipe,
            rating: feedback.rating,
            liked_aspects: feedback.distinct_aspects(),
            feedback_text: feedback
                .improvements
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string),
            mood_at_rating: feedback.mood,
            ai_profile_version_used: version_used,
            created_at: Utc::now(),
        };
        self.db.insert_history_entry(&entry).await?;

        let ai_profile = match self.update_profile(user_id, &entry.recipe_name, feedback).await {
            Ok(profile) => Some(profile),
            Err(MoodchefError::Conflict(message)) => {
                tracing::warn!(user_id, %message, "AI profile update lost a concurrent write");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, user_id, "AI profile update failed");
                None
            }
        };

        Ok(FeedbackOutcome {
            history_entry: entry,
            ai_profile,
        })
    }

    /// Read, compose and write the next profile version while holding the
    /// user's lock. The write is still version-checked so a second process
    /// sharing the database cannot be overwritten silently.
    pub async fn update_profile(
        &self,
        user_id: &str,
        recipe_name: &str,
        feedback: &FeedbackEvent,
    ) -> Result<AiProfile> {
        self.with_user_lock(user_id, self.apply_feedback(user_id, recipe_name, feedback))
            .await
    }

    /// Rebuild the AI profile from the stored background and rating history.
    ///
    /// Unlike the update after a rating, failures here are returned to the
    /// caller. A user with neither a background nor any ratings is
    /// `NotFound`.
    pub async fn regenerate_profile(&self, user_id: &str) -> Result<AiProfile> {
        self.with_user_lock(user_id, self.rebuild(user_id)).await
    }

    async fn apply_feedback(
        &self,
        user_id: &str,
        recipe_name: &str,
        feedback: &FeedbackEvent,
    ) -> Result<AiProfile> {
        let (current, history, background) = self.load_context(user_id).await?;
        let next = self
            .composer
            .compose(CompositionInput {
                user_id,
                recipe_name,
                feedback,
                current: current.as_ref(),
                history: &history,
                background: background.as_ref(),
            })
            .await?;
        self.persist(next, current.as_ref()).await
    }

    async fn rebuild(&self, user_id: &str) -> Result<AiProfile> {
        let (current, history, background) = self.load_context(user_id).await?;
        if history.is_empty() && background.is_none() {
            return Err(MoodchefError::NotFound(format!(
                "Nothing to build a profile from for user {user_id}"
            )));
        }

        let next = self
            .composer
            .regenerate(user_id, current.as_ref(), &history, background.as_ref())
            .await?;
        self.persist(next, current.as_ref()).await
    }

    async fn with_user_lock<T>(
        &self,
        user_id: &str,
        work: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let lock = self.locks.get(user_id);
        let result = {
            let _guard = lock.lock().await;
            work.await
        };
        drop(lock);
        self.locks.release(user_id);
        result
    }

    async fn load_context(&self, user_id: &str) -> Result<ProfileContext> {
        futures::try_join!(
            self.db.get_ai_profile(user_id),
            self.db.recent_history(user_id, self.history_limit),
            self.db.get_user_profile(user_id),
        )
    }

    async fn persist(&self, next: AiProfile, current: Option<&AiProfile>) -> Result<AiProfile> {
        self.db
            .save_ai_profile(&next, current.map(|p| p.version))
            .await?;

        tracing::info!(
            user_id = %next.user_id,
            version = next.version,
            strength = next.profile_strength,
            "AI profile updated"
        );
        Ok(next)
    }

    pub async fn history(&self, user_id: &str, limit: u32) -> Result<Vec<RecipeHistoryEntry>> {
        self.db.recent_history(user_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, LlmConfig};
    use crate::db::{Database, LibSqlBackend};
    use crate::llm::LlmProvider;
    use crate::models::{HealthGoals, LikedAspect, Mood};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn test_db() -> (Arc<dyn DatabaseBackend>, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("file:{}", temp_dir.path().join("feedback.db").display()),
            auth_token: None,
            local_path: None,
        };
        let db = Database::new(&config).await.unwrap();
        (Arc::new(LibSqlBackend::new(db)), temp_dir)
    }

    fn composer(base_url: String) -> ProfileComposer {
        ProfileComposer::new(LlmProvider::new(&LlmConfig {
            model: "openai/gpt-4o-mini".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: Some(base_url),
            timeout_secs: 5,
            max_retries: 0,
            ..LlmConfig::default()
        }))
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

    fn feedback(rating: u8) -> FeedbackEvent {
        FeedbackEvent {
            rating,
            liked_aspects: vec![LikedAspect::Taste, LikedAspect::Taste, LikedAspect::Easy],
            improvements: Some("  ".into()),
            mood: Mood::Comfort,
        }
    }

    #[tokio::test]
    async fn submit_records_history_and_evolves_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(llm_response(
                r#"{"personality_profile": "Comfort seeker", "dietary_summary": "Omnivore", "mood_preferences": "Warm dishes", "energy_patterns": "Low effort evenings"}"#,
            )))
            .mount(&server)
            .await;

        let (db, _dir) = test_db().await;
        let service = FeedbackService::new(db.clone(), composer(server.uri()), 10);

        let first = service
            .submit("u1", "Mac and Cheese", json!({"name": "Mac and Cheese"}), &feedback(5))
            .await
            .unwrap();
        assert_eq!(first.history_entry.ai_profile_version_used, 1);
        assert_eq!(
            first.history_entry.liked_aspects,
            vec![LikedAspect::Taste, LikedAspect::Easy]
        );
        assert!(first.history_entry.feedback_text.is_none());
        assert_eq!(first.ai_profile.as_ref().unwrap().version, 1);

        let second = service
            .submit("u1", "Tomato Soup", json!({"name": "Tomato Soup"}), &feedback(4))
            .await
            .unwrap();
        assert_eq!(second.history_entry.ai_profile_version_used, 1);
        let profile = second.ai_profile.unwrap();
        assert_eq!(profile.version, 2);
        assert_eq!(profile.profile_strength, 2);

        assert_eq!(service.history("u1", 10).await.unwrap().len(), 2);
        assert_eq!(db.get_ai_profile("u1").await.unwrap().unwrap().version, 2);
    }

    #[tokio::test]
    async fn submit_survives_profile_update_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (db, _dir) = test_db().await;
        let service = FeedbackService::new(db.clone(), composer(server.uri()), 10);

        let outcome = service
            .submit("u1", "Pad Thai", json!({"name": "Pad Thai"}), &feedback(3))
            .await
            .unwrap();

        assert!(outcome.ai_profile.is_none());
        assert_eq!(db.recent_history("u1", 10).await.unwrap().len(), 1);
        assert!(db.get_ai_profile("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn submit_rejects_invalid_rating_before_writing() {
        let (db, _dir) = test_db().await;
        let service = FeedbackService::new(
            db.clone(),
            ProfileComposer::new(LlmProvider::unavailable("unused")),
            10,
        );

        let result = service
            .submit("u1", "Pad Thai", json!({}), &feedback(0))
            .await;

        assert!(matches!(result, Err(MoodchefError::Validation(_))));
        assert!(db.recent_history("u1", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_updates_for_one_user_do_not_skip_versions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(llm_response(r#"{"personality_profile": "Steady"}"#))
                    .set_delay(std::time::Duration::from_millis(20)),
            )
            .mount(&server)
            .await;

        let (db, _dir) = test_db().await;
        let service = FeedbackService::new(db.clone(), composer(server.uri()), 10);

        let event = feedback(5);
        let (a, b, c) = tokio::join!(
            service.update_profile("u1", "A", &event),
            service.update_profile("u1", "B", &event),
            service.update_profile("u1", "C", &event),
        );
        let mut versions = vec![a.unwrap().version, b.unwrap().version, c.unwrap().version];
        versions.sort_unstable();

        assert_eq!(versions, vec![1, 2, 3]);
        assert_eq!(db.get_ai_profile("u1").await.unwrap().unwrap().version, 3);
        assert!(service.locks.map().is_empty());
    }

    #[tokio::test]
    async fn user_locks_are_released_after_failed_updates() {
        let (db, _dir) = test_db().await;
        let service = FeedbackService::new(
            db,
            ProfileComposer::new(LlmProvider::unavailable("unused")),
            10,
        );

        for user in ["u1", "u2", "u3"] {
            assert!(service.update_profile(user, "A", &feedback(4)).await.is_err());
        }
        assert!(service.locks.map().is_empty());
    }

    #[tokio::test]
    async fn regenerate_without_background_or_history_is_not_found() {
        let (db, _dir) = test_db().await;
        let service = FeedbackService::new(
            db,
            ProfileComposer::new(LlmProvider::unavailable("unused")),
            10,
        );

        let result = service.regenerate_profile("ghost").await;
        assert!(matches!(result, Err(MoodchefError::NotFound(_))));
    }

    #[tokio::test]
    async fn regenerate_rebuilds_from_background_and_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("Rebuild this user's cooking personality profile"))
            .and(body_string_contains("Favorite cuisines: Korean"))
            .respond_with(ResponseTemplate::new(200).set_body_json(llm_response(
                r#"{"personality_profile": "Spice lover", "dietary_summary": "Omnivore"}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let (db, _dir) = test_db().await;
        db.upsert_user_profile(&UserProfile {
            user_id: "u1".into(),
            name: "Sam".into(),
            age_range: String::new(),
            gender: String::new(),
            ethnicity: String::new(),
            cuisine_preferences: vec!["Korean".into()],
            disliked_foods: vec![],
            health_goals: HealthGoals::default(),
            cooking_skill: None,
            updated_at: Utc::now(),
        })
        .await
        .unwrap();
        let previous = AiProfile::evolve("u1", None, Default::default());
        db.save_ai_profile(&previous, None).await.unwrap();

        let service = FeedbackService::new(db.clone(), composer(server.uri()), 10);
        let regenerated = service.regenerate_profile("u1").await.unwrap();

        assert_eq!(regenerated.version, 2);
        assert_eq!(regenerated.profile_strength, 2);
        assert_eq!(regenerated.personality_profile, "Spice lover");
        assert_eq!(db.get_ai_profile("u1").await.unwrap().unwrap().version, 2);
        assert!(db.recent_history("u1", 10).await.unwrap().is_empty());
    }
}
