pub mod feedback;
pub(crate) mod health;
pub mod integrations;
pub mod profile;
pub mod recipes;
pub mod saved_recipes;

pub use health::health_check;
