//! Shared fixtures for floor tests: a manual clock and engine harness.

use crate::floor::{
    adapters::memory::InMemoryTaskStore, services::TaskLifecycleEngine,
};
use crate::project::{
    adapters::memory::InMemoryProjectStore,
    domain::{LineId, Project, ProjectLine},
    ports::ProjectRepository,
    services::SnapshotService,
};
use crate::recipe::domain::{DeviceTypeId, Recipe, RecipeStep, StepOrder};
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex};

/// Deterministic clock whose time only moves when a test advances it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at the given instant.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(TimeDelta::minutes(minutes));
    }

    pub fn advance_seconds(&self, seconds: i64) {
        self.advance(TimeDelta::seconds(seconds));
    }

    fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock");
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// A fixed shift start for duration tests.
pub fn shift_start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-06T08:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

pub fn order(value: u32) -> StepOrder {
    StepOrder::new(value).expect("positive step order")
}

/// A step bound to a fresh device type, ready to freeze.
pub fn device_step(name: &str, sequence: u32, estimated_minutes: u32) -> RecipeStep {
    RecipeStep::new(name, order(sequence), estimated_minutes)
        .expect("valid step name")
        .with_device_type(DeviceTypeId::new())
}

/// A linear recipe of `count` freezable steps.
pub fn linear_recipe(clock: &impl Clock, count: u32) -> Recipe {
    let mut steps: Vec<RecipeStep> = Vec::new();
    for sequence in 1..=count {
        let mut step = device_step(&format!("Step {sequence}"), sequence, 30);
        if let Some(previous) = steps.last() {
            step = step.with_depends_on([previous.id()]);
        }
        steps.push(step);
    }
    Recipe::new("Frame assembly", steps, Vec::new(), clock).expect("valid recipe")
}

/// Engine plus the repositories it runs against.
pub struct EngineHarness<C>
where
    C: Clock + Send + Sync,
{
    pub tasks: Arc<InMemoryTaskStore>,
    pub projects: Arc<InMemoryProjectStore>,
    pub clock: Arc<C>,
    pub engine: TaskLifecycleEngine<InMemoryTaskStore, InMemoryProjectStore, C>,
}

/// Builds an engine over fresh in-memory repositories.
pub fn engine_harness<C>(clock: C) -> EngineHarness<C>
where
    C: Clock + Send + Sync,
{
    let tasks = Arc::new(InMemoryTaskStore::new());
    let projects = Arc::new(InMemoryProjectStore::new());
    let clock = Arc::new(clock);
    let engine = TaskLifecycleEngine::new(
        Arc::clone(&tasks),
        Arc::clone(&projects),
        Arc::clone(&clock),
    );
    EngineHarness {
        tasks,
        projects,
        clock,
        engine,
    }
}

impl<C> EngineHarness<C>
where
    C: Clock + Send + Sync,
{
    /// Stores and activates a project with one `steps`-step line committing
    /// to `target` units.
    pub async fn seed_active_project(&self, steps: u32, target: u32) -> Project {
        let recipe = linear_recipe(self.clock.as_ref(), steps);
        let snapshot = SnapshotService::new(Arc::clone(&self.clock))
            .freeze_recipe(&recipe)
            .expect("freeze should succeed");
        let line = ProjectLine::new(snapshot, target).expect("valid line");
        let mut project =
            Project::new("Batch 7 frames", vec![line], self.clock.as_ref()).expect("valid project");

        self.projects
            .store(&project)
            .await
            .expect("store should succeed");
        let expected = project.version();
        project
            .activate(self.clock.as_ref())
            .expect("activation should succeed");
        self.projects
            .update_versioned(&project, expected)
            .await
            .expect("activation write should succeed");
        project
    }
}

/// The identifier of a project's only line.
pub fn only_line_id(project: &Project) -> LineId {
    project
        .lines()
        .first()
        .map(ProjectLine::id)
        .expect("project must have a line")
}
