//! Error types for floor task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while mutating floor task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The requested status transition is not allowed by the state machine.
    #[error("task {task_id} cannot transition from {from} to {to}")]
    InvalidTransition {
        /// The task being transitioned.
        task_id: TaskId,
        /// The current status.
        from: TaskStatus,
        /// The rejected target status.
        to: TaskStatus,
    },

    /// A live task is missing its start timestamp.
    #[error("task {0} has no start timestamp to derive a duration from")]
    StartTimestampMissing(TaskId),

    /// Progress can only be reported on live tasks.
    #[error("task {task_id} is terminal ({status}) and no longer accepts progress")]
    TerminalTask {
        /// The task progress was reported against.
        task_id: TaskId,
        /// Its terminal status.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
