use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::intelligence::ProfileComposer;
use crate::llm::LlmProvider;
use crate::services::{FeedbackService, IntegrationService, ProfileService, RecipeService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub llm: LlmProvider,
    pub recipes: RecipeService,
    pub feedback: FeedbackService,
    pub profiles: ProfileService,
    pub integrations: IntegrationService,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>, llm: LlmProvider) -> Self {
        let config = Arc::new(config);

        let recipes = RecipeService::new(db.clone(), llm.clone());
        let feedback = FeedbackService::new(
            db.clone(),
            ProfileComposer::new(llm.clone()),
            config.profile.history_limit,
        );
        let profiles = ProfileService::new(db.clone(), config.profile.overview_history_limit);
        let integrations = IntegrationService::new(db.clone());

        Self {
            config,
            db,
            llm,
            recipes,
            feedback,
            profiles,
            integrations,
        }
    }
}
