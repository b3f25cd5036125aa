//! Port contracts for recipe and product master data.
//!
//! Ports define infrastructure-agnostic interfaces used by recipe services.

pub mod repository;

pub use repository::{RecipeRepository, RecipeRepositoryError, RecipeRepositoryResult};
