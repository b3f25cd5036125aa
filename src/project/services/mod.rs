//! Application services for project creation and stewardship.

mod numbering;
mod planning;
mod progress;
mod snapshot;

pub use numbering::{NumberingError, NumberingResult, ProjectNumberGenerator};
pub use planning::{
    CreateProjectRequest, PlanningError, PlanningResult, ProjectLineSpec, ProjectPlanningService,
    SnapshotSourceRef,
};
pub use progress::{ProgressError, ProgressResult, ProjectProgressService};
pub use snapshot::{SnapshotError, SnapshotResult, SnapshotService};
