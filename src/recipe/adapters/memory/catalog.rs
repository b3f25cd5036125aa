//! In-memory recipe and product catalog for tests and tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::recipe::{
    domain::{Product, ProductId, Recipe, RecipeId},
    ports::{RecipeRepository, RecipeRepositoryError, RecipeRepositoryResult},
};

/// Thread-safe in-memory recipe and product repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecipeCatalog {
    state: Arc<RwLock<CatalogState>>,
}

#[derive(Debug, Default)]
struct CatalogState {
    recipes: HashMap<RecipeId, Recipe>,
    products: HashMap<ProductId, Product>,
}

impl InMemoryRecipeCatalog {
    /// Creates an empty in-memory catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeRepository for InMemoryRecipeCatalog {
    async fn store_recipe(&self, recipe: &Recipe) -> RecipeRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            RecipeRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.recipes.contains_key(&recipe.id()) {
            return Err(RecipeRepositoryError::DuplicateRecipe(recipe.id()));
        }
        state.recipes.insert(recipe.id(), recipe.clone());
        Ok(())
    }

    async fn store_product(&self, product: &Product) -> RecipeRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            RecipeRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.products.contains_key(&product.id()) {
            return Err(RecipeRepositoryError::DuplicateProduct(product.id()));
        }
        state.products.insert(product.id(), product.clone());
        Ok(())
    }

    async fn find_recipe(&self, id: RecipeId) -> RecipeRepositoryResult<Option<Recipe>> {
        let state = self.state.read().map_err(|err| {
            RecipeRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.recipes.get(&id).cloned())
    }

    async fn find_product(&self, id: ProductId) -> RecipeRepositoryResult<Option<Product>> {
        let state = self.state.read().map_err(|err| {
            RecipeRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.products.get(&id).cloned())
    }
}
