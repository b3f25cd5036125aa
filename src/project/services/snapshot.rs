//! Freezing recipe and product definitions into immutable snapshots.

use crate::project::domain::{RawMaterialRef, Snapshot, SnapshotOrigin, SnapshotStep};
use crate::recipe::domain::{
    GraphError, Product, RawMaterialRequirement, Recipe, RecipeStep, StepId, dependency_order,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors rejecting a freeze.
///
/// Freeze validation is fail-fast: a rejected definition produces no
/// snapshot and therefore no project line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// The definition has no steps.
    #[error("cannot freeze a definition with no steps")]
    EmptyStepList,

    /// A step has no device type bound.
    #[error("step {step_id} has no device type and cannot be frozen")]
    MissingDeviceType {
        /// The offending step.
        step_id: StepId,
    },

    /// The step dependency graph is malformed or cyclic.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type for freeze operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Deep-copies recipe and product definitions into project snapshots.
///
/// The copy is structural: the snapshot owns every string and list it
/// carries, so no later mutation of the source is observable through it.
#[derive(Clone)]
pub struct SnapshotService<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
}

impl<C> SnapshotService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new snapshot service.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    /// Freezes a recipe into a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::EmptyStepList`] for a stepless definition,
    /// [`SnapshotError::MissingDeviceType`] when any step lacks a device
    /// type, or [`SnapshotError::Graph`] when the step graph is rejected.
    pub fn freeze_recipe(&self, recipe: &Recipe) -> SnapshotResult<Snapshot> {
        let origin = SnapshotOrigin::Recipe {
            recipe_id: recipe.id(),
            version: recipe.version(),
        };
        self.freeze_definition(origin, recipe.name(), recipe.steps(), recipe.raw_materials())
    }

    /// Freezes a product into a snapshot.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SnapshotService::freeze_recipe`].
    pub fn freeze_product(&self, product: &Product) -> SnapshotResult<Snapshot> {
        let origin = SnapshotOrigin::Product {
            product_id: product.id(),
            version: product.version(),
        };
        self.freeze_definition(
            origin,
            product.name(),
            product.steps(),
            product.raw_materials(),
        )
    }

    fn freeze_definition(
        &self,
        origin: SnapshotOrigin,
        source_name: &str,
        steps: &[RecipeStep],
        raw_materials: &[RawMaterialRequirement],
    ) -> SnapshotResult<Snapshot> {
        if steps.is_empty() {
            return Err(SnapshotError::EmptyStepList);
        }

        let mut frozen_steps = Vec::with_capacity(steps.len());
        for step in steps {
            let device_type_id = step
                .device_type_id()
                .ok_or(SnapshotError::MissingDeviceType { step_id: step.id() })?;
            let mut frozen = SnapshotStep::new(
                step.id(),
                step.name(),
                step.order(),
                device_type_id,
                step.estimated_minutes(),
            )
            .with_depends_on(step.depends_on().iter().copied());
            if let Some(description) = step.description() {
                frozen = frozen.with_description(description);
            }
            frozen_steps.push(frozen);
        }

        // Acyclicity was checked at authoring time; re-check so a corrupt
        // definition can never freeze into in-flight work.
        dependency_order(&frozen_steps)?;

        let materials = raw_materials.iter().map(RawMaterialRef::from).collect();
        Ok(Snapshot::new(
            origin,
            source_name,
            frozen_steps,
            materials,
            self.clock.utc(),
        ))
    }
}
