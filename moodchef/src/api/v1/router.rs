use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let users = Router::new()
        .route(
            "/{userId}/profile",
            put(handlers::profile::save_profile).get(handlers::profile::get_profile),
        )
        .route("/{userId}/ai-profile", get(handlers::profile::get_ai_profile))
        .route(
            "/{userId}/ai-profile:regenerate",
            post(handlers::profile::regenerate_ai_profile),
        )
        .route(
            "/{userId}/recipes:generate",
            post(handlers::recipes::generate_recipes),
        )
        .route(
            "/{userId}/saved-recipes",
            get(handlers::saved_recipes::list_saved_recipes)
                .post(handlers::saved_recipes::save_recipe),
        )
        .route(
            "/{userId}/saved-recipes/{savedId}",
            delete(handlers::saved_recipes::delete_saved_recipe),
        )
        .route(
            "/{userId}/saved-recipes/{savedId}/cook",
            post(handlers::saved_recipes::cook_saved_recipe),
        )
        .route("/{userId}/feedback", post(handlers::feedback::submit_feedback))
        .route("/{userId}/history", get(handlers::feedback::list_history))
        .route(
            "/{userId}/integrations",
            get(handlers::integrations::list_integrations),
        )
        .route(
            "/{userId}/integrations/{integrationType}/connect",
            post(handlers::integrations::connect_integration),
        );

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .nest("/users", users)
        .route("/recipes:scale", post(handlers::recipes::scale_recipe))
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
