use crate::error::Result;
use crate::intelligence::parser::parse_profile_update;
use crate::intelligence::utils::HistoryStats;
use crate::llm::prompts::{profile_regeneration_prompt, profile_update_prompt};
use crate::llm::LlmProvider;
use crate::models::{AiProfile, FeedbackEvent, RecipeHistoryEntry, UserProfile};

const SYSTEM_PROMPT: &str =
    "You maintain concise cooking personality profiles. Respond with a single JSON object only.";

/// Everything the composer needs to revise one user's profile.
pub struct CompositionInput<'a> {
    pub user_id: &'a str,
    pub recipe_name: &'a str,
    pub feedback: &'a FeedbackEvent,
    pub current: Option<&'a AiProfile>,
    pub history: &'a [RecipeHistoryEntry],
    pub background: Option<&'a UserProfile>,
}

/// Turns a rating plus recent history into the next [`AiProfile`] version.
///
/// The composer never writes anything; persisting the result (and guarding
/// against concurrent writers) is the caller's job.
#[derive(Clone)]
pub struct ProfileComposer {
    llm: LlmProvider,
}

impl ProfileComposer {
    pub fn new(llm: LlmProvider) -> Self {
        Self { llm }
    }

    pub async fn compose(&self, input: CompositionInput<'_>) -> Result<AiProfile> {
        let stats = HistoryStats::from_history(input.history);
        let prompt = profile_update_prompt(
            input.recipe_name,
            input.feedback,
            input.current,
            &stats,
            input.background,
        );

        self.complete(input.user_id, input.current, &prompt).await
    }

    /// Rebuild the profile from stored history and background with no new
    /// rating. Version and strength advance as for any other update.
    pub async fn regenerate(
        &self,
        user_id: &str,
        current: Option<&AiProfile>,
        history: &[RecipeHistoryEntry],
        background: Option<&UserProfile>,
    ) -> Result<AiProfile> {
        let stats = HistoryStats::from_history(history);
        let prompt = profile_regeneration_prompt(current, &stats, background);
        self.complete(user_id, current, &prompt).await
    }

    async fn complete(
        &self,
        user_id: &str,
        current: Option<&AiProfile>,
        prompt: &str,
    ) -> Result<AiProfile> {
        let response = self
            .llm
            .complete_with_system(prompt, Some(SYSTEM_PROMPT), None)
            .await?;
        let update = parse_profile_update(&response, current)?;

        let next = AiProfile::evolve(user_id, current, update);
        tracing::debug!(
            user_id,
            version = next.version,
            strength = next.profile_strength,
            "Composed AI profile"
        );

        Ok(next)
    }
}
