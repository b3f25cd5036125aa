//! Project creation and status stewardship.

use crate::project::{
    domain::{Project, ProjectDomainError, ProjectId, ProjectLine},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::recipe::{
    domain::{ProductId, RecipeId},
    ports::{RecipeRepository, RecipeRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

use super::{
    NumberingError, ProjectNumberGenerator, SnapshotError, SnapshotService,
};

/// Reference to the definition a project line freezes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSourceRef {
    /// Freeze a recipe.
    Recipe(RecipeId),
    /// Freeze a product definition.
    Product(ProductId),
}

/// One line of a project creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectLineSpec {
    source: SnapshotSourceRef,
    target_quantity: u32,
}

impl ProjectLineSpec {
    /// Creates a line spec committing to a target quantity.
    #[must_use]
    pub const fn new(source: SnapshotSourceRef, target_quantity: u32) -> Self {
        Self {
            source,
            target_quantity,
        }
    }
}

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    lines: Vec<ProjectLineSpec>,
}

impl CreateProjectRequest {
    /// Creates a request with the project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    /// Appends a snapshot line.
    #[must_use]
    pub fn with_line(mut self, line: ProjectLineSpec) -> Self {
        self.lines.push(line);
        self
    }
}

/// Service-level errors for project planning operations.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Freezing a snapshot failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// Number allocation failed.
    #[error(transparent)]
    Numbering(#[from] NumberingError),
    /// The referenced recipe does not exist.
    #[error("recipe not found: {0}")]
    RecipeNotFound(RecipeId),
    /// The referenced product does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),
    /// The project does not exist.
    #[error("project not found: {0}")]
    NotFound(ProjectId),
    /// A concurrent writer updated the project first.
    #[error("concurrent update lost for project {0}")]
    Conflict(ProjectId),
    /// Project repository operation failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
    /// Master data repository operation failed.
    #[error(transparent)]
    Catalog(#[from] RecipeRepositoryError),
}

/// Result type for project planning operations.
pub type PlanningResult<T> = Result<T, PlanningError>;

/// Creates projects against frozen snapshots and stewards their status.
///
/// Creation is fail-fast: any rejected freeze aborts the whole request and
/// nothing is stored. Activation assigns the project number exactly once.
#[derive(Clone)]
pub struct ProjectPlanningService<P, R, C>
where
    P: ProjectRepository,
    R: RecipeRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    catalog: Arc<R>,
    snapshots: SnapshotService<C>,
    numbering: ProjectNumberGenerator<P, C>,
    clock: Arc<C>,
}

impl<P, R, C> ProjectPlanningService<P, R, C>
where
    P: ProjectRepository,
    R: RecipeRepository,
    C: Clock + Send + Sync,
{
    /// Creates a planning service with the default number prefix.
    #[must_use]
    pub fn new(projects: Arc<P>, catalog: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            snapshots: SnapshotService::new(Arc::clone(&clock)),
            numbering: ProjectNumberGenerator::new(Arc::clone(&projects), Arc::clone(&clock)),
            projects,
            catalog,
            clock,
        }
    }

    /// Overrides the project number prefix.
    #[must_use]
    pub fn with_number_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.numbering = self.numbering.with_prefix(prefix);
        self
    }

    /// Creates a project in planning status, freezing one snapshot per
    /// requested line.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::RecipeNotFound`] /
    /// [`PlanningError::ProductNotFound`] for unknown sources,
    /// [`PlanningError::Snapshot`] when a freeze is rejected, or
    /// [`PlanningError::Domain`] when the aggregate itself is invalid. No
    /// partial project is ever stored.
    pub async fn create_project(&self, request: CreateProjectRequest) -> PlanningResult<Project> {
        let CreateProjectRequest { name, lines } = request;

        let mut frozen_lines = Vec::with_capacity(lines.len());
        for spec in lines {
            let snapshot = match spec.source {
                SnapshotSourceRef::Recipe(recipe_id) => {
                    let recipe = self
                        .catalog
                        .find_recipe(recipe_id)
                        .await?
                        .ok_or(PlanningError::RecipeNotFound(recipe_id))?;
                    self.snapshots.freeze_recipe(&recipe)?
                }
                SnapshotSourceRef::Product(product_id) => {
                    let product = self
                        .catalog
                        .find_product(product_id)
                        .await?
                        .ok_or(PlanningError::ProductNotFound(product_id))?;
                    self.snapshots.freeze_product(&product)?
                }
            };
            frozen_lines.push(ProjectLine::new(snapshot, spec.target_quantity)?);
        }

        let project = Project::new(name, frozen_lines, &*self.clock)?;
        self.projects.store(&project).await?;
        Ok(project)
    }

    /// Activates a planned project and allocates its project number.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::NotFound`] for an unknown project,
    /// [`PlanningError::Domain`] when the status machine rejects the
    /// transition, [`PlanningError::Conflict`] when a concurrent writer wins
    /// the optimistic check, or [`PlanningError::Numbering`] when number
    /// allocation fails.
    pub async fn activate_project(&self, project_id: ProjectId) -> PlanningResult<Project> {
        let project = self
            .transition(project_id, |project, clock| project.activate(clock))
            .await?;
        let numbered = self.numbering.allocate(&project).await?;
        Ok(numbered)
    }

    /// Suspends an active project.
    ///
    /// # Errors
    ///
    /// Same not-found/transition/conflict conditions as
    /// [`ProjectPlanningService::activate_project`], without numbering.
    pub async fn hold_project(&self, project_id: ProjectId) -> PlanningResult<Project> {
        self.transition(project_id, |project, clock| project.hold(clock))
            .await
    }

    /// Resumes a suspended project.
    ///
    /// # Errors
    ///
    /// Same not-found/transition/conflict conditions as
    /// [`ProjectPlanningService::hold_project`].
    pub async fn resume_project(&self, project_id: ProjectId) -> PlanningResult<Project> {
        self.transition(project_id, |project, clock| project.resume(clock))
            .await
    }

    /// Abandons a project.
    ///
    /// # Errors
    ///
    /// Same not-found/transition/conflict conditions as
    /// [`ProjectPlanningService::hold_project`].
    pub async fn cancel_project(&self, project_id: ProjectId) -> PlanningResult<Project> {
        self.transition(project_id, |project, clock| project.cancel(clock))
            .await
    }

    /// Loads, mutates, and optimistically persists a project.
    async fn transition<F>(&self, project_id: ProjectId, apply: F) -> PlanningResult<Project>
    where
        F: FnOnce(&mut Project, &C) -> Result<(), ProjectDomainError>,
    {
        let mut project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(PlanningError::NotFound(project_id))?;

        let expected_version = project.version();
        apply(&mut project, self.clock.as_ref())?;

        self.projects
            .update_versioned(&project, expected_version)
            .await
            .map_err(|err| match err {
                ProjectRepositoryError::VersionMismatch { .. } => {
                    PlanningError::Conflict(project_id)
                }
                other => PlanningError::Projects(other),
            })?;
        Ok(project)
    }
}
