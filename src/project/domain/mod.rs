//! Domain model for production projects.
//!
//! The project domain models the frozen snapshot value types, the project
//! aggregate with its status machine and per-line produced/target
//! quantities, and the human-readable project number.

mod error;
mod ids;
mod project;
mod snapshot;

pub use error::{ParseProjectStatusError, ProjectDomainError};
pub use ids::{LineId, ProjectId, ProjectNumber};
pub use project::{Project, ProjectLine, ProjectStatus};
pub use snapshot::{RawMaterialRef, Snapshot, SnapshotOrigin, SnapshotStep};
