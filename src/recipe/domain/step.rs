//! Authoring-level manufacturing step definition.

use super::{DeviceTypeId, RecipeDomainError, StepId, StepNode, StepOrder};
use serde::{Deserialize, Serialize};

/// One unit of a recipe or product: a manufacturing step bound to a device
/// class, with an estimated duration and zero or more prerequisite steps.
///
/// The device type is optional while a definition is being drafted; freezing
/// a snapshot requires it on every step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    id: StepId,
    name: String,
    order: StepOrder,
    device_type_id: Option<DeviceTypeId>,
    estimated_minutes: u32,
    description: Option<String>,
    depends_on: Vec<StepId>,
}

impl RecipeStep {
    /// Creates a step with a fresh identifier and no dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeDomainError::EmptyStepName`] when the name is empty
    /// after trimming.
    pub fn new(
        name: impl Into<String>,
        order: StepOrder,
        estimated_minutes: u32,
    ) -> Result<Self, RecipeDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecipeDomainError::EmptyStepName);
        }
        Ok(Self {
            id: StepId::new(),
            name,
            order,
            device_type_id: None,
            estimated_minutes,
            description: None,
            depends_on: Vec::new(),
        })
    }

    /// Replaces the generated identifier with a caller-supplied one.
    #[must_use]
    pub const fn with_id(mut self, id: StepId) -> Self {
        self.id = id;
        self
    }

    /// Binds the step to the device class that can execute it.
    #[must_use]
    pub const fn with_device_type(mut self, device_type_id: DeviceTypeId) -> Self {
        self.device_type_id = Some(device_type_id);
        self
    }

    /// Sets the step description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the prerequisite steps.
    #[must_use]
    pub fn with_depends_on(mut self, depends_on: impl IntoIterator<Item = StepId>) -> Self {
        self.depends_on = depends_on.into_iter().collect();
        self
    }

    /// Returns the step identifier.
    #[must_use]
    pub const fn id(&self) -> StepId {
        self.id
    }

    /// Returns the step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the step's order within its definition.
    #[must_use]
    pub const fn order(&self) -> StepOrder {
        self.order
    }

    /// Returns the bound device type, if one has been chosen.
    #[must_use]
    pub const fn device_type_id(&self) -> Option<DeviceTypeId> {
        self.device_type_id
    }

    /// Returns the estimated duration in whole minutes.
    #[must_use]
    pub const fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    /// Returns the step description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the prerequisite step identifiers.
    #[must_use]
    pub fn depends_on(&self) -> &[StepId] {
        &self.depends_on
    }
}

impl StepNode for RecipeStep {
    fn step_id(&self) -> StepId {
        self.id
    }

    fn sequence(&self) -> StepOrder {
        self.order
    }

    fn prerequisites(&self) -> &[StepId] {
        &self.depends_on
    }
}
