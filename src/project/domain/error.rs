//! Error types for project domain validation and parsing.

use super::{LineId, ProjectId, ProjectStatus};
use thiserror::Error;

/// Errors returned while constructing and mutating project domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The project has no snapshot lines.
    #[error("project must carry at least one snapshot line")]
    NoLines,

    /// The line's target quantity is zero.
    #[error("target quantity must be positive")]
    ZeroTargetQuantity,

    /// The project number prefix is empty after trimming.
    #[error("project number prefix must not be empty")]
    EmptyNumberPrefix,

    /// The project number sequence is not a positive integer.
    #[error("invalid project number sequence {0}, expected a positive integer")]
    InvalidSequence(u32),

    /// The requested status transition is not allowed by the state machine.
    #[error("project {project_id} cannot transition from {from} to {to}")]
    InvalidStatusTransition {
        /// The project being transitioned.
        project_id: ProjectId,
        /// The current status.
        from: ProjectStatus,
        /// The rejected target status.
        to: ProjectStatus,
    },

    /// A project number has already been assigned.
    #[error("project {0} already carries a project number")]
    NumberAlreadyAssigned(ProjectId),

    /// Number assignment requires an active project.
    #[error("project {project_id} must be active to receive a number, status is {status}")]
    NumberRequiresActiveProject {
        /// The project being numbered.
        project_id: ProjectId,
        /// The status that blocked the assignment.
        status: ProjectStatus,
    },

    /// The referenced line does not belong to the project.
    #[error("project {project_id} has no line {line_id}")]
    UnknownLine {
        /// The owning project.
        project_id: ProjectId,
        /// The unresolvable line identifier.
        line_id: LineId,
    },
}

/// Error returned while parsing project statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);
