//! Port contracts for floor task persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the lifecycle
//! engine.

pub mod repository;

pub use repository::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
