//! GitHub contribution calendar for the activity widget

mod client;
mod models;
mod summary;

pub use client::{ContributionsClient, DEFAULT_GITHUB_API};
pub use models::*;
pub use summary::*;
