//! Repository port for floor task persistence with optimistic concurrency.

use crate::floor::domain::{Task, TaskId, TaskStatus, WorkerId};
use crate::project::domain::{LineId, ProjectId};
use crate::recipe::domain::DeviceTypeId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Typed criteria object for task queries.
///
/// Every field is optional; unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    project_id: Option<ProjectId>,
    line_id: Option<LineId>,
    status: Option<TaskStatus>,
    device_type_id: Option<DeviceTypeId>,
    worker_id: Option<WorkerId>,
}

impl TaskFilter {
    /// Creates an unconstrained filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrains results to one project.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Constrains results to one project line.
    #[must_use]
    pub const fn with_line(mut self, line_id: LineId) -> Self {
        self.line_id = Some(line_id);
        self
    }

    /// Constrains results to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Constrains results to one device class.
    #[must_use]
    pub const fn with_device_type(mut self, device_type_id: DeviceTypeId) -> Self {
        self.device_type_id = Some(device_type_id);
        self
    }

    /// Constrains results to one worker.
    #[must_use]
    pub const fn with_worker(mut self, worker_id: WorkerId) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    /// Returns the project criterion, if set.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns whether the task satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(project_id) = self.project_id {
            if task.project_id() != project_id {
                return false;
            }
        }
        if let Some(line_id) = self.line_id {
            if task.line_id() != line_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status() != status {
                return false;
            }
        }
        if let Some(device_type_id) = self.device_type_id {
            if task.device_type_id() != device_type_id {
                return false;
            }
        }
        if let Some(worker_id) = self.worker_id {
            if task.worker_id() != Some(worker_id) {
                return false;
            }
        }
        true
    }
}

/// Floor task persistence contract.
///
/// `update_versioned` is the single compare-and-swap the lifecycle engine
/// serialises completion races on: the write succeeds only when the stored
/// version still equals the caller's expectation.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task when the stored version matches
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, or [`TaskRepositoryError::VersionMismatch`] when another
    /// writer got there first.
    async fn update_versioned(
        &self,
        task: &Task,
        expected_version: u64,
    ) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks satisfying the filter.
    async fn find(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored version does not match the caller's expectation.
    #[error("stale write for task {task_id}: expected version {expected}, found {actual}")]
    VersionMismatch {
        /// The task being written.
        task_id: TaskId,
        /// The version the caller based its mutation on.
        expected: u64,
        /// The version actually stored.
        actual: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
