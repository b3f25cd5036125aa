//! Service layer for registering graph-validated recipes and products.

use crate::recipe::{
    domain::{GraphError, Product, Recipe, dependency_order},
    ports::{RecipeRepository, RecipeRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for recipe authoring operations.
#[derive(Debug, Error)]
pub enum AuthoringError {
    /// The step dependency graph is malformed or cyclic.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RecipeRepositoryError),
}

/// Result type for recipe authoring operations.
pub type AuthoringResult<T> = Result<T, AuthoringError>;

/// Registration service enforcing graph validity on master data.
///
/// Validation is fail-fast: a definition with a malformed or cyclic step
/// graph is never stored.
#[derive(Clone)]
pub struct RecipeAuthoringService<R>
where
    R: RecipeRepository,
{
    repository: Arc<R>,
}

impl<R> RecipeAuthoringService<R>
where
    R: RecipeRepository,
{
    /// Creates a new authoring service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validates and stores a recipe.
    ///
    /// A draft with no steps is accepted; a non-empty step list must form a
    /// valid acyclic graph.
    ///
    /// # Errors
    ///
    /// Returns [`AuthoringError::Graph`] when the step graph is rejected, or
    /// [`AuthoringError::Repository`] when persistence fails.
    pub async fn register_recipe(&self, recipe: Recipe) -> AuthoringResult<Recipe> {
        if !recipe.steps().is_empty() {
            dependency_order(recipe.steps())?;
        }
        self.repository.store_recipe(&recipe).await?;
        Ok(recipe)
    }

    /// Validates and stores a product.
    ///
    /// # Errors
    ///
    /// Returns [`AuthoringError::Graph`] when the step graph is rejected, or
    /// [`AuthoringError::Repository`] when persistence fails.
    pub async fn register_product(&self, product: Product) -> AuthoringResult<Product> {
        if !product.steps().is_empty() {
            dependency_order(product.steps())?;
        }
        self.repository.store_product(&product).await?;
        Ok(product)
    }
}
