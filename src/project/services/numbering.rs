//! Allocation of date-scoped sequential project numbers.

use crate::project::{
    domain::{Project, ProjectDomainError, ProjectNumber},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// How many allocation attempts are made before giving up.
const MAX_ATTEMPTS: u32 = 3;

/// Base backoff between attempts; grows linearly per attempt.
const BACKOFF: Duration = Duration::from_millis(25);

/// Service-level errors for project number allocation.
#[derive(Debug, Error)]
pub enum NumberingError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Every allocation attempt lost the uniqueness race.
    #[error("project number sequence exhausted after {attempts} attempts")]
    SequenceExhausted {
        /// How many attempts were made.
        attempts: u32,
    },
}

/// Result type for number allocation.
pub type NumberingResult<T> = Result<T, NumberingError>;

/// Allocates `PREFIX-YYYY-MM-DD-NNN` project numbers.
///
/// `NNN` counts the numbers already allocated for the project's creation
/// day (UTC). Counting and claiming are not atomic against concurrent
/// allocators, so the claim is made through the repository's optimistic
/// write and retried with a fresh count when the number is already taken.
#[derive(Clone)]
pub struct ProjectNumberGenerator<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    prefix: String,
}

impl<R, C> ProjectNumberGenerator<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a generator with the default `PRJ` prefix.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            prefix: ProjectNumber::DEFAULT_PREFIX.to_owned(),
        }
    }

    /// Overrides the number prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Allocates a number for an active, not-yet-numbered project and
    /// persists the project through the optimistic write.
    ///
    /// The passed project must already be persisted at its current version.
    /// Returns the numbered, persisted aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`NumberingError::Domain`] when the project cannot receive a
    /// number, [`NumberingError::SequenceExhausted`] when every attempt lost
    /// the uniqueness race, or [`NumberingError::Repository`] for any other
    /// persistence failure.
    pub async fn allocate(&self, project: &Project) -> NumberingResult<Project> {
        let day = project.created_at().date_naive();

        for attempt in 1..=MAX_ATTEMPTS {
            let allocated = self.repository.count_numbers_on(day).await?;
            let sequence = u32::try_from(allocated.saturating_add(1))
                .map_err(|_| NumberingError::SequenceExhausted { attempts: attempt })?;
            let number = ProjectNumber::compose(&self.prefix, day, sequence)?;

            let mut candidate = project.clone();
            let expected_version = candidate.version();
            candidate.assign_number(number, &*self.clock)?;

            match self
                .repository
                .update_versioned(&candidate, expected_version)
                .await
            {
                Ok(()) => return Ok(candidate),
                Err(ProjectRepositoryError::DuplicateProjectNumber(_)) => {
                    tokio::time::sleep(BACKOFF.saturating_mul(attempt)).await;
                }
                Err(other) => return Err(NumberingError::Repository(other)),
            }
        }

        Err(NumberingError::SequenceExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }
}
