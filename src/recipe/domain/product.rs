//! Product aggregate: a sellable item with its own process route.

use super::{ProductId, RawMaterialRequirement, RecipeDomainError, RecipeStep, StepId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Authored, versioned product definition.
///
/// A product carries its own step route and raw-material requirements, just
/// like a recipe; a project line freezes exactly one of the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    version: u32,
    steps: Vec<RecipeStep>,
    raw_materials: Vec<RawMaterialRequirement>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a product at version 1.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeDomainError::EmptyDefinitionName`] when the name is
    /// empty after trimming.
    pub fn new(
        name: impl Into<String>,
        steps: Vec<RecipeStep>,
        raw_materials: Vec<RawMaterialRequirement>,
        clock: &impl Clock,
    ) -> Result<Self, RecipeDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecipeDomainError::EmptyDefinitionName);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: ProductId::new(),
            name,
            version: 1,
            steps,
            raw_materials,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the product identifier.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.id
    }

    /// Returns the product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the version number.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the ordered step definitions.
    #[must_use]
    pub fn steps(&self) -> &[RecipeStep] {
        &self.steps
    }

    /// Returns the raw-material requirements.
    #[must_use]
    pub fn raw_materials(&self) -> &[RawMaterialRequirement] {
        &self.raw_materials
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest edit timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Looks up a step by identifier.
    #[must_use]
    pub fn step_by_id(&self, step_id: StepId) -> Option<&RecipeStep> {
        self.steps.iter().find(|step| step.id() == step_id)
    }
}
