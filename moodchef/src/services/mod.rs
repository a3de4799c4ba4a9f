mod feedback;
mod integrations;
mod profiles;
mod recipes;

pub use feedback::{FeedbackOutcome, FeedbackService};
pub use integrations::IntegrationService;
pub use profiles::{Onboarding, ProfileOverview, ProfileService};
pub use recipes::RecipeService;
