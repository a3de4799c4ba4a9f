mod common;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{init_test_logger, llm_response, test_database, test_llm_provider};
use moodchef::error::MoodchefError;
use moodchef::llm::LlmProvider;
use moodchef::models::{Difficulty, EnergyLevel, Mood, RecipePreferences};
use moodchef::services::RecipeService;

fn chicken_and_rice() -> RecipePreferences {
    RecipePreferences {
        ingredients: vec!["chicken".to_string(), "rice".to_string()],
        dietary_restrictions: vec![],
        cuisine_preferences: vec!["Any".to_string()],
        mood_level: Mood::Happy,
        energy_level: EnergyLevel::Medium,
        cooking_time: 30,
        servings: 2,
    }
}

#[tokio::test]
async fn test_generate_end_to_end() {
    init_test_logger();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("chicken, rice"))
        .and(body_string_contains("Maximum cooking time: 30 minutes"))
        .and(body_string_contains("Servings: 2"))
        .and(body_string_contains("must start with a numeric quantity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(llm_response(
            r#"Here you go:
```json
[{"title": "Lemon Chicken Rice", "ingredients": ["1 cup rice", "2 chicken thighs"],
  "instructions": ["Cook rice", "Sear chicken"], "prepTime": 10, "cookTime": 20,
  "difficulty": "easy", "cuisineType": "Mediterranean"}]
```"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (db, _dir) = test_database().await;
    let service = RecipeService::new(db, test_llm_provider(server.uri()));

    let recipes = service.generate("u1", &chicken_and_rice()).await.unwrap();

    assert_eq!(recipes.len(), 1);
    let recipe = &recipes[0];
    assert_eq!(recipe.name, "Lemon Chicken Rice");
    assert_eq!(recipe.servings, 2);
    assert_eq!(recipe.difficulty, Difficulty::Easy);
    assert_eq!(recipe.cuisine, "Mediterranean");
    assert_eq!(recipe.ingredients, vec!["1 cup rice", "2 chicken thighs"]);
    assert_eq!(recipe.instructions, vec!["Cook rice", "Sear chicken"]);
    assert_eq!(recipe.total_time, 30);
    assert!(!recipe.id.is_empty());
}

#[tokio::test]
async fn test_generate_surfaces_unparseable_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(llm_response("Sorry, I cannot cook today.")),
        )
        .mount(&server)
        .await;

    let (db, _dir) = test_database().await;
    let service = RecipeService::new(db, test_llm_provider(server.uri()));

    let result = service.generate("u1", &chicken_and_rice()).await;
    assert!(matches!(result, Err(MoodchefError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_generate_without_credential() {
    let (db, _dir) = test_database().await;
    let service = RecipeService::new(db, LlmProvider::unavailable("LLM_API_KEY is not configured"));

    let result = service.generate("u1", &chicken_and_rice()).await;
    assert!(matches!(result, Err(MoodchefError::Configuration(_))));
}

#[tokio::test]
async fn test_generated_recipe_scales_and_saves() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(llm_response(
            r#"[{"name": "Chicken Congee", "servings": 2, "ingredients": ["1 cup rice", "1/2 lb chicken", "salt to taste"]}]"#,
        )))
        .mount(&server)
        .await;

    let (db, _dir) = test_database().await;
    let service = RecipeService::new(db, test_llm_provider(server.uri()));

    let recipe = service
        .generate("u1", &chicken_and_rice())
        .await
        .unwrap()
        .remove(0);

    let scaled = service.scale(&recipe, 6).unwrap();
    assert_eq!(scaled.servings, 6);
    assert_eq!(
        scaled.ingredients,
        vec!["3 cup rice", "1 1/2 lb chicken", "salt to taste"]
    );

    let saved = service
        .save("u1", serde_json::to_value(&scaled).unwrap())
        .await
        .unwrap();
    assert_eq!(saved.recipe_name, "Chicken Congee");

    let cooked = service.mark_cooked("u1", &saved.id).await.unwrap();
    assert_eq!(cooked.cooked_count, 1);

    let listed = service.list_saved("u1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].recipe["servings"], json!(6));

    assert!(service.list_saved("someone-else").await.unwrap().is_empty());
}
