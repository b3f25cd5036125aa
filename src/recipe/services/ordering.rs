//! Service exposing the dependency order of a recipe for visualisation.

use crate::recipe::{
    domain::{GraphError, RecipeId, RecipeStep, dependency_order},
    ports::{RecipeRepository, RecipeRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for dependency order queries.
#[derive(Debug, Error)]
pub enum OrderingError {
    /// The recipe does not exist.
    #[error("recipe not found: {0}")]
    RecipeNotFound(RecipeId),
    /// The step dependency graph is malformed or cyclic.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RecipeRepositoryError),
}

/// Result type for dependency order queries.
pub type OrderingResult<T> = Result<T, OrderingError>;

/// Read-side service resolving a recipe's linear execution order.
#[derive(Clone)]
pub struct DependencyOrderService<R>
where
    R: RecipeRepository,
{
    repository: Arc<R>,
}

impl<R> DependencyOrderService<R>
where
    R: RecipeRepository,
{
    /// Creates a new dependency order service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the recipe's steps in execution order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::RecipeNotFound`] for an unknown recipe,
    /// [`OrderingError::Graph`] when the stored graph is rejected, or
    /// [`OrderingError::Repository`] when the lookup fails.
    pub async fn dependency_order(&self, recipe_id: RecipeId) -> OrderingResult<Vec<RecipeStep>> {
        let recipe = self
            .repository
            .find_recipe(recipe_id)
            .await?
            .ok_or(OrderingError::RecipeNotFound(recipe_id))?;

        let order = dependency_order(recipe.steps())?;
        let ordered = order
            .into_iter()
            .filter_map(|step_id| recipe.step_by_id(step_id).cloned())
            .collect();
        Ok(ordered)
    }
}
