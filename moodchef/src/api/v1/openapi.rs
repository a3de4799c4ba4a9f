use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Moodchef API",
        version = "1.0.0",
        description = "Mood-aware recipe recommendations with a profile that learns from every rating.",
    ),
    paths(
        handlers::health::health_check,
        handlers::recipes::generate_recipes,
        handlers::recipes::scale_recipe,
        handlers::saved_recipes::list_saved_recipes,
        handlers::saved_recipes::save_recipe,
        handlers::saved_recipes::cook_saved_recipe,
        handlers::saved_recipes::delete_saved_recipe,
        handlers::profile::save_profile,
        handlers::profile::get_profile,
        handlers::profile::get_ai_profile,
        handlers::profile::regenerate_ai_profile,
        handlers::feedback::submit_feedback,
        handlers::feedback::list_history,
        handlers::integrations::list_integrations,
        handlers::integrations::connect_integration,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Domain
        models::Mood,
        models::EnergyLevel,
        models::Difficulty,
        models::Nutrition,
        models::Recipe,
        models::RecipePreferences,
        models::LikedAspect,
        models::HealthGoals,
        models::UserProfile,
        models::DietaryRestriction,
        models::AiProfile,
        models::IntegrationType,
        models::IntegrationStatus,
        // Recipes
        dto::GenerateRecipesResponse,
        dto::ScaleRecipeRequest,
        dto::ScaleRecipeResponse,
        dto::SaveRecipeRequest,
        dto::SavedRecipeResponse,
        dto::ListSavedRecipesResponse,
        // Profile
        dto::OnboardingRequest,
        dto::ProfileOverviewResponse,
        // Feedback
        dto::SubmitFeedbackRequest,
        dto::FeedbackResponse,
        dto::HistoryEntryResponse,
        dto::HistoryResponse,
        // Integrations
        dto::IntegrationsResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::LlmStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "recipes", description = "Recipe generation and scaling"),
        (name = "saved-recipes", description = "Bookmarked recipes"),
        (name = "profile", description = "Onboarding answers and the learned AI profile"),
        (name = "feedback", description = "Ratings and rating history"),
        (name = "integrations", description = "Third-party integrations (not yet available)"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/health",
            "/api/v1/recipes:scale",
            "/api/v1/users/{userId}/recipes:generate",
            "/api/v1/users/{userId}/ai-profile:regenerate",
            "/api/v1/users/{userId}/saved-recipes/{savedId}/cook",
            "/api/v1/users/{userId}/integrations/{integrationType}/connect",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }
}
