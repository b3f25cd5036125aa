//! Repository port for recipe and product persistence and lookup.

use crate::recipe::domain::{Product, ProductId, Recipe, RecipeId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for recipe repository operations.
pub type RecipeRepositoryResult<T> = Result<T, RecipeRepositoryError>;

/// Recipe and product persistence contract.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Stores a new recipe.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeRepositoryError::DuplicateRecipe`] when the recipe ID
    /// already exists.
    async fn store_recipe(&self, recipe: &Recipe) -> RecipeRepositoryResult<()>;

    /// Stores a new product.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeRepositoryError::DuplicateProduct`] when the product
    /// ID already exists.
    async fn store_product(&self, product: &Product) -> RecipeRepositoryResult<()>;

    /// Finds a recipe by identifier.
    ///
    /// Returns `None` when the recipe does not exist.
    async fn find_recipe(&self, id: RecipeId) -> RecipeRepositoryResult<Option<Recipe>>;

    /// Finds a product by identifier.
    ///
    /// Returns `None` when the product does not exist.
    async fn find_product(&self, id: ProductId) -> RecipeRepositoryResult<Option<Product>>;
}

/// Errors returned by recipe repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RecipeRepositoryError {
    /// A recipe with the same identifier already exists.
    #[error("duplicate recipe identifier: {0}")]
    DuplicateRecipe(RecipeId),

    /// A product with the same identifier already exists.
    #[error("duplicate product identifier: {0}")]
    DuplicateProduct(ProductId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RecipeRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
