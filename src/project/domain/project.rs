//! Project aggregate root, lines, and the project status machine.

use super::{
    LineId, ParseProjectStatusError, ProjectDomainError, ProjectId, ProjectNumber, Snapshot,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a production project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// The project is being planned and has no project number yet.
    Planning,
    /// Production is under way.
    Active,
    /// Production is temporarily suspended.
    OnHold,
    /// Every line reached its target quantity.
    Completed,
    /// The project was abandoned.
    Cancelled,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether the status machine allows the transition.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Planning, Self::Active | Self::Cancelled)
                | (Self::Active, Self::OnHold | Self::Completed | Self::Cancelled)
                | (Self::OnHold, Self::Active | Self::Cancelled)
        )
    }

    /// Returns whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "planning" => Ok(Self::Planning),
            "active" => Ok(Self::Active),
            "on_hold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}

/// One snapshot line of a project: a frozen definition plus the committed
/// and fulfilled quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLine {
    id: LineId,
    snapshot: Snapshot,
    target_quantity: u32,
    produced_quantity: u32,
}

impl ProjectLine {
    /// Creates a line committing to a target quantity against a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::ZeroTargetQuantity`] when the target is
    /// zero.
    pub fn new(snapshot: Snapshot, target_quantity: u32) -> Result<Self, ProjectDomainError> {
        if target_quantity == 0 {
            return Err(ProjectDomainError::ZeroTargetQuantity);
        }
        Ok(Self {
            id: LineId::new(),
            snapshot,
            target_quantity,
            produced_quantity: 0,
        })
    }

    /// Returns the line identifier.
    #[must_use]
    pub const fn id(&self) -> LineId {
        self.id
    }

    /// Returns the frozen snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Returns the committed quantity.
    #[must_use]
    pub const fn target_quantity(&self) -> u32 {
        self.target_quantity
    }

    /// Returns the fulfilled quantity.
    #[must_use]
    pub const fn produced_quantity(&self) -> u32 {
        self.produced_quantity
    }

    /// Returns whether the line reached its target.
    #[must_use]
    pub const fn is_fulfilled(&self) -> bool {
        self.produced_quantity >= self.target_quantity
    }
}

/// Project aggregate root: a commitment to produce target quantities
/// against one or more frozen snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    status: ProjectStatus,
    project_number: Option<ProjectNumber>,
    lines: Vec<ProjectLine>,
    progress: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Project {
    /// Creates a project in planning status.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyProjectName`] when the name is
    /// empty after trimming, or [`ProjectDomainError::NoLines`] when no
    /// lines are given.
    pub fn new(
        name: impl Into<String>,
        lines: Vec<ProjectLine>,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProjectDomainError::EmptyProjectName);
        }
        if lines.is_empty() {
            return Err(ProjectDomainError::NoLines);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: ProjectId::new(),
            name,
            status: ProjectStatus::Planning,
            project_number: None,
            lines,
            progress: 0,
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
        })
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the assigned project number, if any.
    #[must_use]
    pub const fn project_number(&self) -> Option<&ProjectNumber> {
        self.project_number.as_ref()
    }

    /// Returns the snapshot lines.
    #[must_use]
    pub fn lines(&self) -> &[ProjectLine] {
        &self.lines
    }

    /// Looks up a line by identifier.
    #[must_use]
    pub fn line(&self, line_id: LineId) -> Option<&ProjectLine> {
        self.lines.iter().find(|line| line.id() == line_id)
    }

    /// Returns the derived completion percentage, 0 to 100.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic-concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Transitions the project from planning to active.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidStatusTransition`] when the
    /// project is not in planning.
    pub fn activate(&mut self, clock: &impl Clock) -> Result<(), ProjectDomainError> {
        self.transition_to(ProjectStatus::Active, clock)
    }

    /// Suspends an active project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidStatusTransition`] when the
    /// project is not active.
    pub fn hold(&mut self, clock: &impl Clock) -> Result<(), ProjectDomainError> {
        self.transition_to(ProjectStatus::OnHold, clock)
    }

    /// Resumes a suspended project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidStatusTransition`] when the
    /// project is not on hold.
    pub fn resume(&mut self, clock: &impl Clock) -> Result<(), ProjectDomainError> {
        self.transition_to(ProjectStatus::Active, clock)
    }

    /// Abandons the project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::InvalidStatusTransition`] when the
    /// project is already terminal.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), ProjectDomainError> {
        self.transition_to(ProjectStatus::Cancelled, clock)
    }

    /// Assigns the generated project number.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::NumberRequiresActiveProject`] when the
    /// project is not active, or
    /// [`ProjectDomainError::NumberAlreadyAssigned`] when a number is
    /// already set.
    pub fn assign_number(
        &mut self,
        number: ProjectNumber,
        clock: &impl Clock,
    ) -> Result<(), ProjectDomainError> {
        if self.status != ProjectStatus::Active {
            return Err(ProjectDomainError::NumberRequiresActiveProject {
                project_id: self.id,
                status: self.status,
            });
        }
        if self.project_number.is_some() {
            return Err(ProjectDomainError::NumberAlreadyAssigned(self.id));
        }
        self.project_number = Some(number);
        self.touch(clock);
        Ok(())
    }

    /// Records one completed pass through a line's step sequence.
    ///
    /// Increments the line's produced quantity, refreshes the derived
    /// progress, and completes the project when every line reached its
    /// target while the project is active. Returns the refreshed progress.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::UnknownLine`] when the line does not
    /// belong to this project.
    pub fn record_unit_produced(
        &mut self,
        line_id: LineId,
        clock: &impl Clock,
    ) -> Result<u8, ProjectDomainError> {
        let project_id = self.id;
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.id() == line_id)
            .ok_or(ProjectDomainError::UnknownLine {
                project_id,
                line_id,
            })?;
        line.produced_quantity = line.produced_quantity.saturating_add(1);

        self.progress = self.computed_progress();
        let all_fulfilled = self.lines.iter().all(ProjectLine::is_fulfilled);
        if all_fulfilled && self.status.can_transition_to(ProjectStatus::Completed) {
            self.status = ProjectStatus::Completed;
        }
        self.touch(clock);
        Ok(self.progress)
    }

    /// Computes the completion percentage from the lines without mutating
    /// the aggregate.
    ///
    /// Sums produced and target quantities across every line, rounds
    /// `100 * produced / target` to the nearest integer, and clamps to
    /// 0 to 100. A zero total target yields 0 rather than a division error.
    #[must_use]
    pub fn computed_progress(&self) -> u8 {
        let produced: u64 = self
            .lines
            .iter()
            .map(|line| u64::from(line.produced_quantity()))
            .sum();
        let target: u64 = self
            .lines
            .iter()
            .map(|line| u64::from(line.target_quantity()))
            .sum();
        rounded_percent(produced, target)
    }

    /// Refreshes the stored progress from the lines.
    ///
    /// Idempotent: when the recomputed value matches the stored one the
    /// aggregate is left untouched (no version bump). Returns the progress.
    pub fn refresh_progress(&mut self, clock: &impl Clock) -> u8 {
        let fresh = self.computed_progress();
        if fresh != self.progress {
            self.progress = fresh;
            self.touch(clock);
        }
        self.progress
    }

    /// Applies a guarded status transition.
    fn transition_to(
        &mut self,
        target: ProjectStatus,
        clock: &impl Clock,
    ) -> Result<(), ProjectDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(ProjectDomainError::InvalidStatusTransition {
                project_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Bumps the mutation timestamp and optimistic-concurrency version.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
        self.version = self.version.saturating_add(1);
    }
}

/// Rounds `100 * produced / target` to the nearest integer, clamped to
/// 0 to 100. A zero target yields 0.
const fn rounded_percent(produced: u64, target: u64) -> u8 {
    if target == 0 {
        return 0;
    }
    let scaled = produced
        .saturating_mul(100)
        .saturating_add(target / 2)
        / target;
    if scaled > 100 { 100 } else { scaled as u8 }
}
