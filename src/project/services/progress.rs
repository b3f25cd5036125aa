//! Recomputation of a project's derived completion percentage.

use crate::project::{
    domain::ProjectId,
    ports::{ProjectRepository, ProjectRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for progress recomputation.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// The project does not exist.
    #[error("project not found: {0}")]
    NotFound(ProjectId),
    /// A concurrent writer updated the project first.
    #[error("concurrent update lost for project {0}")]
    Conflict(ProjectId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
}

/// Result type for progress recomputation.
pub type ProgressResult<T> = Result<T, ProgressError>;

/// Recomputes and persists a project's completion percentage.
///
/// The lifecycle engine refreshes progress whenever it records produced
/// units; this service is the explicit entry point for project edits and
/// manual recovery tooling. Recomputation is idempotent: an unchanged value
/// performs no write.
#[derive(Clone)]
pub struct ProjectProgressService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ProjectProgressService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new progress service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Recomputes the project's progress from its lines and persists the
    /// value when it changed. Returns the fresh progress.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::NotFound`] for an unknown project,
    /// [`ProgressError::Conflict`] when a concurrent writer wins the
    /// optimistic check, or [`ProgressError::Repository`] for any other
    /// persistence failure.
    pub async fn recompute(&self, project_id: ProjectId) -> ProgressResult<u8> {
        let mut project = self
            .repository
            .find_by_id(project_id)
            .await?
            .ok_or(ProgressError::NotFound(project_id))?;

        let stored = project.progress();
        let expected_version = project.version();
        let fresh = project.refresh_progress(&*self.clock);
        if fresh == stored {
            return Ok(fresh);
        }

        self.repository
            .update_versioned(&project, expected_version)
            .await
            .map_err(|err| match err {
                ProjectRepositoryError::VersionMismatch { .. } => {
                    ProgressError::Conflict(project_id)
                }
                other => ProgressError::Repository(other),
            })?;
        Ok(fresh)
    }
}
