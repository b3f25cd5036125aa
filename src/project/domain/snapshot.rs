//! Frozen, point-in-time copies of recipe and product definitions.
//!
//! A snapshot is a value type: it owns full structural copies of the step
//! definitions and raw-material references it was frozen from. No mutation
//! of the source recipe or product is observable through a snapshot.

use crate::recipe::domain::{
    DeviceTypeId, ProductId, RawMaterialId, RawMaterialRequirement, RecipeId, StepId, StepNode,
    StepOrder,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source a snapshot was frozen from.
///
/// Exactly one of recipe or product; the enum makes "both" and "neither"
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotOrigin {
    /// Frozen from an authored recipe.
    Recipe {
        /// The source recipe identifier.
        recipe_id: RecipeId,
        /// The recipe version at freeze time.
        version: u32,
    },
    /// Frozen from an authored product definition.
    Product {
        /// The source product identifier.
        product_id: ProductId,
        /// The product version at freeze time.
        version: u32,
    },
}

/// Frozen copy of one manufacturing step.
///
/// Unlike the authoring-level step, the device type is mandatory here: a
/// snapshot only exists for definitions that passed freeze validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStep {
    step_id: StepId,
    name: String,
    order: StepOrder,
    device_type_id: DeviceTypeId,
    estimated_minutes: u32,
    description: Option<String>,
    depends_on: Vec<StepId>,
}

impl SnapshotStep {
    /// Creates a frozen step copy.
    #[must_use]
    pub fn new(
        step_id: StepId,
        name: impl Into<String>,
        order: StepOrder,
        device_type_id: DeviceTypeId,
        estimated_minutes: u32,
    ) -> Self {
        Self {
            step_id,
            name: name.into(),
            order,
            device_type_id,
            estimated_minutes,
            description: None,
            depends_on: Vec::new(),
        }
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
        self.step_id
    }

    /// Returns the step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the step's order within the snapshot.
    #[must_use]
    pub const fn order(&self) -> StepOrder {
        self.order
    }

    /// Returns the device class bound to this step.
    #[must_use]
    pub const fn device_type_id(&self) -> DeviceTypeId {
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

impl StepNode for SnapshotStep {
    fn step_id(&self) -> StepId {
        self.step_id
    }

    fn sequence(&self) -> StepOrder {
        self.order
    }

    fn prerequisites(&self) -> &[StepId] {
        &self.depends_on
    }
}

/// Frozen raw-material reference with denormalized descriptive fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMaterialRef {
    material_id: RawMaterialId,
    code: String,
    name: String,
    specification: Option<String>,
    supplier: Option<String>,
    unit: String,
    quantity: u32,
}

impl RawMaterialRef {
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

impl From<&RawMaterialRequirement> for RawMaterialRef {
    fn from(requirement: &RawMaterialRequirement) -> Self {
        Self {
            material_id: requirement.material_id(),
            code: requirement.code().to_owned(),
            name: requirement.name().to_owned(),
            specification: requirement.specification().map(str::to_owned),
            supplier: requirement.supplier().map(str::to_owned),
            unit: requirement.unit().to_owned(),
            quantity: requirement.quantity(),
        }
    }
}

/// Immutable, point-in-time copy of a recipe or product frozen into a
/// project line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    origin: SnapshotOrigin,
    source_name: String,
    steps: Vec<SnapshotStep>,
    raw_materials: Vec<RawMaterialRef>,
    total_estimated_minutes: u32,
    frozen_at: DateTime<Utc>,
}

impl Snapshot {
    /// Creates a snapshot; the total estimated duration is computed from the
    /// step list.
    #[must_use]
    pub fn new(
        origin: SnapshotOrigin,
        source_name: impl Into<String>,
        steps: Vec<SnapshotStep>,
        raw_materials: Vec<RawMaterialRef>,
        frozen_at: DateTime<Utc>,
    ) -> Self {
        let total_estimated_minutes = steps
            .iter()
            .fold(0u32, |total, step| {
                total.saturating_add(step.estimated_minutes())
            });
        Self {
            origin,
            source_name: source_name.into(),
            steps,
            raw_materials,
            total_estimated_minutes,
            frozen_at,
        }
    }

    /// Returns the snapshot origin.
    #[must_use]
    pub const fn origin(&self) -> SnapshotOrigin {
        self.origin
    }

    /// Returns the name of the source definition at freeze time.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Returns the frozen step copies.
    #[must_use]
    pub fn steps(&self) -> &[SnapshotStep] {
        &self.steps
    }

    /// Returns the frozen raw-material references.
    #[must_use]
    pub fn raw_materials(&self) -> &[RawMaterialRef] {
        &self.raw_materials
    }

    /// Returns the sum of step durations in whole minutes.
    #[must_use]
    pub const fn total_estimated_minutes(&self) -> u32 {
        self.total_estimated_minutes
    }

    /// Returns the freeze timestamp.
    #[must_use]
    pub const fn frozen_at(&self) -> DateTime<Utc> {
        self.frozen_at
    }

    /// Looks up a step by identifier.
    #[must_use]
    pub fn step_by_id(&self, step_id: StepId) -> Option<&SnapshotStep> {
        self.steps.iter().find(|step| step.id() == step_id)
    }

    /// Looks up a step by its order value.
    #[must_use]
    pub fn step_at_order(&self, order: StepOrder) -> Option<&SnapshotStep> {
        self.steps.iter().find(|step| step.order() == order)
    }
}
