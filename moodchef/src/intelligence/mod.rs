pub mod parser;
pub mod profile;
pub mod scaling;
pub mod utils;

pub use profile::{CompositionInput, ProfileComposer};
