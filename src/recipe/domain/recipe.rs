//! Recipe aggregate and raw-material requirements.

use super::{RawMaterialId, RecipeDomainError, RecipeId, RecipeStep, StepId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Denormalized raw-material requirement carried by a recipe or product.
///
/// Descriptive fields are copied from the material master record at
/// authoring time so a frozen snapshot stays readable even if the material
/// record changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMaterialRequirement {
    material_id: RawMaterialId,
    code: String,
    name: String,
    specification: Option<String>,
    supplier: Option<String>,
    unit: String,
    quantity: u32,
}

impl RawMaterialRequirement {
    /// Creates a requirement with the mandatory descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeDomainError::EmptyMaterialCode`] when the code is
    /// empty after trimming, or [`RecipeDomainError::ZeroMaterialQuantity`]
    /// when the quantity is zero.
    pub fn new(
        material_id: RawMaterialId,
        code: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity: u32,
    ) -> Result<Self, RecipeDomainError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(RecipeDomainError::EmptyMaterialCode);
        }
        if quantity == 0 {
            return Err(RecipeDomainError::ZeroMaterialQuantity);
        }
        Ok(Self {
            material_id,
            code,
            name: name.into(),
            specification: None,
            supplier: None,
            unit: unit.into(),
            quantity,
        })
    }

    /// Sets the material specification.
    #[must_use]
    pub fn with_specification(mut self, specification: impl Into<String>) -> Self {
        self.specification = Some(specification.into());
        self
    }

    /// Sets the material supplier.
    #[must_use]
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    /// Returns the material identifier.
    #[must_use]
    pub const fn material_id(&self) -> RawMaterialId {
        self.material_id
    }

    /// Returns the material code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the material name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the material specification, if any.
    #[must_use]
    pub fn specification(&self) -> Option<&str> {
        self.specification.as_deref()
    }

    /// Returns the material supplier, if any.
    #[must_use]
    pub fn supplier(&self) -> Option<&str> {
        self.supplier.as_deref()
    }

    /// Returns the unit of measure.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the required quantity per produced unit.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Authored, versioned definition of an ordered, dependency-constrained set
/// of manufacturing steps.
///
/// A recipe referenced by a project snapshot is never mutated through the
/// snapshot; later edits here are invisible to in-flight work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    id: RecipeId,
    name: String,
    version: u32,
    steps: Vec<RecipeStep>,
    raw_materials: Vec<RawMaterialRequirement>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Creates a recipe at version 1.
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
            id: RecipeId::new(),
            name,
            version: 1,
            steps,
            raw_materials,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the recipe identifier.
    #[must_use]
    pub const fn id(&self) -> RecipeId {
        self.id
    }

    /// Returns the recipe name.
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

    /// Renames the recipe and bumps the version.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeDomainError::EmptyDefinitionName`] when the name is
    /// empty after trimming.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), RecipeDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecipeDomainError::EmptyDefinitionName);
        }
        self.name = name;
        self.touch(clock);
        Ok(())
    }

    /// Appends a step and bumps the version.
    ///
    /// Graph validity is re-checked at registration and freeze time, not
    /// here.
    pub fn add_step(&mut self, step: RecipeStep, clock: &impl Clock) {
        self.steps.push(step);
        self.touch(clock);
    }

    /// Bumps the version and edit timestamp.
    fn touch(&mut self, clock: &impl Clock) {
        self.version = self.version.saturating_add(1);
        self.updated_at = clock.utc();
    }
}
