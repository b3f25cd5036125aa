//! Shared builders for project tests.

use crate::project::domain::{Project, ProjectLine, Snapshot};
use crate::project::services::SnapshotService;
use crate::recipe::domain::{DeviceTypeId, RawMaterialId, RawMaterialRequirement, Recipe, RecipeStep, StepOrder};
use mockable::DefaultClock;
use std::sync::Arc;

pub fn order(value: u32) -> StepOrder {
    StepOrder::new(value).expect("positive step order")
}

/// A step bound to a fresh device type, ready to freeze.
pub fn device_step(name: &str, sequence: u32, estimated_minutes: u32) -> RecipeStep {
    RecipeStep::new(name, order(sequence), estimated_minutes)
        .expect("valid step name")
        .with_device_type(DeviceTypeId::new())
}

/// A linear recipe of `count` freezable steps, each depending on the one
/// before it.
pub fn linear_recipe(clock: &DefaultClock, count: u32) -> Recipe {
    let mut steps: Vec<RecipeStep> = Vec::new();
    for sequence in 1..=count {
        let mut step = device_step(&format!("Step {sequence}"), sequence, 30);
        if let Some(previous) = steps.last() {
            step = step.with_depends_on([previous.id()]);
        }
        steps.push(step);
    }
    let materials = vec![
        RawMaterialRequirement::new(RawMaterialId::new(), "STL-01", "Steel sheet", "kg", 2)
            .expect("valid material")
            .with_supplier("Ferro Works"),
    ];
    Recipe::new("Frame assembly", steps, materials, clock).expect("valid recipe")
}

/// Freezes `linear_recipe` into a snapshot.
pub fn frozen_snapshot(clock: &DefaultClock, steps: u32) -> Snapshot {
    let recipe = linear_recipe(clock, steps);
    SnapshotService::new(Arc::new(DefaultClock))
        .freeze_recipe(&recipe)
        .expect("freeze should succeed")
}

/// A planning-status project with one line committing to `target` units.
pub fn project_with_target(clock: &DefaultClock, steps: u32, target: u32) -> Project {
    let line =
        ProjectLine::new(frozen_snapshot(clock, steps), target).expect("valid project line");
    Project::new("Batch 7 frames", vec![line], clock).expect("valid project")
}
