use std::sync::Arc;

use crate::db::DatabaseBackend;
use crate::error::{MoodchefError, Result};
use crate::models::{IntegrationStatus, IntegrationType};

/// Health and delivery integrations. Only status reporting exists; connecting
/// an account is not available yet.
#[derive(Clone)]
pub struct IntegrationService {
    db: Arc<dyn DatabaseBackend>,
}

impl IntegrationService {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    /// Every known integration, in a fixed order, with stored state where
    /// there is any.
    pub async fn list(&self, user_id: &str) -> Result<Vec<IntegrationStatus>> {
        let stored = self.db.list_integrations(user_id).await?;

        Ok(IntegrationType::ALL
            .into_iter()
            .map(|integration_type| {
                stored
                    .iter()
                    .find(|s| s.integration_type == integration_type)
                    .cloned()
                    .unwrap_or_else(|| IntegrationStatus::disconnected(integration_type))
            })
            .collect())
    }

    pub async fn connect(
        &self,
        user_id: &str,
        integration_type: IntegrationType,
    ) -> Result<IntegrationStatus> {
        tracing::info!(user_id, integration = %integration_type, "Integration connect requested");
        Err(MoodchefError::Configuration(format!(
            "{integration_type} integration is coming soon"
        )))
    }
}
