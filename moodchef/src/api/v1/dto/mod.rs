//! v1 API Data Transfer Objects.
//!
//! Wire types for the v1 REST API, kept apart from the domain models in
//! `src/models/`. Domain types that already have the right wire shape
//! (`Recipe`, `AiProfile`, `IntegrationStatus`) are used directly.

pub mod common;
pub mod feedback;
pub mod integrations;
pub mod profile;
pub mod recipes;

pub use common::*;
pub use feedback::*;
pub use integrations::*;
pub use profile::*;
pub use recipes::*;
