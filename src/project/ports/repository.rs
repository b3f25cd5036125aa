//! Repository port for project persistence with optimistic concurrency.

use crate::project::domain::{Project, ProjectId, ProjectNumber, ProjectStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Typed criteria object for project queries.
///
/// Every field is optional; unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    status: Option<ProjectStatus>,
    created_on: Option<NaiveDate>,
}

impl ProjectFilter {
    /// Creates an unconstrained filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrains results to one status.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Constrains results to projects created on a UTC calendar day.
    #[must_use]
    pub const fn with_created_on(mut self, day: NaiveDate) -> Self {
        self.created_on = Some(day);
        self
    }

    /// Returns whether the project satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(status) = self.status {
            if project.status() != status {
                return false;
            }
        }
        if let Some(day) = self.created_on {
            if project.created_at().date_naive() != day {
                return false;
            }
        }
        true
    }
}

/// Project persistence contract.
///
/// `update_versioned` is the single compare-and-swap the services build
/// their concurrency guarantees on: the write succeeds only when the stored
/// version still equals the caller's expectation.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the project
    /// ID already exists.
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Persists changes to an existing project when the stored version
    /// matches `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does
    /// not exist, [`ProjectRepositoryError::VersionMismatch`] when another
    /// writer got there first, or
    /// [`ProjectRepositoryError::DuplicateProjectNumber`] when the write
    /// would claim a number another project already holds.
    async fn update_versioned(
        &self,
        project: &Project,
        expected_version: u64,
    ) -> ProjectRepositoryResult<()>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Returns all projects satisfying the filter.
    async fn find(&self, filter: &ProjectFilter) -> ProjectRepositoryResult<Vec<Project>>;

    /// Counts project numbers already allocated for the given UTC calendar
    /// day.
    async fn count_numbers_on(&self, day: NaiveDate) -> ProjectRepositoryResult<u64>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// Another project already holds the number.
    #[error("duplicate project number: {0}")]
    DuplicateProjectNumber(ProjectNumber),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The stored version does not match the caller's expectation.
    #[error("stale write for project {project_id}: expected version {expected}, found {actual}")]
    VersionMismatch {
        /// The project being written.
        project_id: ProjectId,
        /// The version the caller based its mutation on.
        expected: u64,
        /// The version actually stored.
        actual: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
