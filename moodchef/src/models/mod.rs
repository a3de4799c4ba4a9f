mod common;
mod feedback;
mod integration;
mod profile;
mod recipe;

pub use common::*;
pub use feedback::*;
pub use integration::*;
pub use profile::*;
pub use recipe::*;
