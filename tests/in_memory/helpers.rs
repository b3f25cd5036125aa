//! Shared harness wiring the in-memory adapters to every service.

use mockable::DefaultClock;
use std::sync::Arc;
use takt::floor::adapters::memory::InMemoryTaskStore;
use takt::floor::services::TaskLifecycleEngine;
use takt::project::adapters::memory::InMemoryProjectStore;
use takt::project::services::ProjectPlanningService;
use takt::recipe::adapters::memory::InMemoryRecipeCatalog;
use takt::recipe::domain::{DeviceTypeId, Recipe, RecipeStep, StepOrder};
use takt::recipe::services::RecipeAuthoringService;

/// Every service of the core wired against shared in-memory repositories.
pub struct FactoryHarness {
    pub projects: Arc<InMemoryProjectStore>,
    pub tasks: Arc<InMemoryTaskStore>,
    pub authoring: RecipeAuthoringService<InMemoryRecipeCatalog>,
    pub planning:
        ProjectPlanningService<InMemoryProjectStore, InMemoryRecipeCatalog, DefaultClock>,
    pub engine: TaskLifecycleEngine<InMemoryTaskStore, InMemoryProjectStore, DefaultClock>,
}

pub fn factory() -> FactoryHarness {
    let catalog = Arc::new(InMemoryRecipeCatalog::new());
    let projects = Arc::new(InMemoryProjectStore::new());
    let tasks = Arc::new(InMemoryTaskStore::new());
    let clock = Arc::new(DefaultClock);

    FactoryHarness {
        authoring: RecipeAuthoringService::new(Arc::clone(&catalog)),
        planning: ProjectPlanningService::new(
            Arc::clone(&projects),
            Arc::clone(&catalog),
            Arc::clone(&clock),
        ),
        engine: TaskLifecycleEngine::new(
            Arc::clone(&tasks),
            Arc::clone(&projects),
            Arc::clone(&clock),
        ),
        projects,
        tasks,
    }
}

/// A linear recipe of `count` device-bound steps named `Step N`.
pub fn frame_recipe(count: u32) -> Recipe {
    let mut steps: Vec<RecipeStep> = Vec::new();
    for sequence in 1..=count {
        let order = StepOrder::new(sequence).expect("positive step order");
        let mut step = RecipeStep::new(format!("Step {sequence}"), order, 30)
            .expect("valid step name")
            .with_device_type(DeviceTypeId::new());
        if let Some(previous) = steps.last() {
            step = step.with_depends_on([previous.id()]);
        }
        steps.push(step);
    }
    Recipe::new("Frame assembly", steps, Vec::new(), &DefaultClock).expect("valid recipe")
}
