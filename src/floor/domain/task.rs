//! Floor task aggregate root and pause-time bookkeeping.

use super::{DeviceId, Progress, TaskDomainError, TaskId, TaskStatus, WorkerId};
use crate::project::domain::{LineId, ProjectId, SnapshotStep};
use crate::recipe::domain::{DeviceTypeId, StepId};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Whether accumulated paused time counts towards a derived actual
/// duration.
///
/// An explicit parameter on completion: the worker clock keeps running
/// while a task is paused, and call sites differ on whether that idle time
/// is working time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PausedTimePolicy {
    /// Subtract paused time from the derived duration.
    #[default]
    Exclude,
    /// Count paused time as working time.
    Include,
}

/// Work-order instance of one snapshot step, executed by one worker on one
/// device, for one project line.
///
/// The device type is copied verbatim from the snapshot step at creation
/// time and never looked up live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    line_id: LineId,
    step_id: StepId,
    title: String,
    description: Option<String>,
    device_type_id: DeviceTypeId,
    estimated_minutes: u32,
    status: TaskStatus,
    progress: Progress,
    worker_id: Option<WorkerId>,
    device_id: Option<DeviceId>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
    paused_seconds: i64,
    actual_minutes: Option<i64>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Task {
    /// Creates the pending work order for one snapshot step.
    ///
    /// The title is derived from the project and step names; device type,
    /// duration, and description are copied from the frozen step.
    #[must_use]
    pub fn for_step(
        project_id: ProjectId,
        line_id: LineId,
        step: &SnapshotStep,
        project_name: &str,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            project_id,
            line_id,
            step_id: step.id(),
            title: format!("{project_name}: {}", step.name()),
            description: step.description().map(str::to_owned),
            device_type_id: step.device_type_id(),
            estimated_minutes: step.estimated_minutes(),
            status: TaskStatus::Pending,
            progress: Progress::ZERO,
            worker_id: None,
            device_id: None,
            started_at: None,
            completed_at: None,
            paused_at: None,
            paused_seconds: 0,
            actual_minutes: None,
            notes: None,
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the owning project line.
    #[must_use]
    pub const fn line_id(&self) -> LineId {
        self.line_id
    }

    /// Returns the snapshot step this task executes.
    #[must_use]
    pub const fn step_id(&self) -> StepId {
        self.step_id
    }

    /// Returns the derived title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description copied from the step, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the device class required to execute the task.
    #[must_use]
    pub const fn device_type_id(&self) -> DeviceTypeId {
        self.device_type_id
    }

    /// Returns the estimated duration in whole minutes.
    #[must_use]
    pub const fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the recorded progress.
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Returns the assigned worker, if any.
    #[must_use]
    pub const fn worker_id(&self) -> Option<WorkerId> {
        self.worker_id
    }

    /// Returns the assigned device, if any.
    #[must_use]
    pub const fn device_id(&self) -> Option<DeviceId> {
        self.device_id
    }

    /// Returns when execution started, if it has.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when execution completed, if it has.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the accumulated paused time in seconds.
    #[must_use]
    pub const fn paused_seconds(&self) -> i64 {
        self.paused_seconds
    }

    /// Returns the actual duration in whole minutes, once completed.
    #[must_use]
    pub const fn actual_minutes(&self) -> Option<i64> {
        self.actual_minutes
    }

    /// Returns the operator notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
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

    /// Starts execution: assigns the worker and optional device and stamps
    /// the start time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] unless the task is
    /// pending.
    pub fn start(
        &mut self,
        worker_id: WorkerId,
        device_id: Option<DeviceId>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        // Starting is only valid from pending; a paused task re-enters
        // ongoing through resume, which keeps the original start timestamp.
        if self.status != TaskStatus::Pending {
            return Err(TaskDomainError::InvalidTransition {
                task_id: self.id,
                from: self.status,
                to: TaskStatus::Ongoing,
            });
        }
        self.status = TaskStatus::Ongoing;
        self.worker_id = Some(worker_id);
        self.device_id = device_id;
        self.started_at = Some(clock.utc());
        self.touch(clock);
        Ok(())
    }

    /// Suspends execution. Progress and elapsed time are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] unless the task is
    /// ongoing.
    pub fn pause(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Paused)?;
        self.status = TaskStatus::Paused;
        self.paused_at = Some(clock.utc());
        self.touch(clock);
        Ok(())
    }

    /// Resumes a paused task from exactly where it left off.
    ///
    /// Progress is never reset by a resume; the open pause is folded into
    /// the accumulated paused time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] unless the task is
    /// paused.
    pub fn resume(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::Paused {
            return Err(TaskDomainError::InvalidTransition {
                task_id: self.id,
                from: self.status,
                to: TaskStatus::Ongoing,
            });
        }
        let now = clock.utc();
        self.fold_open_pause(now);
        self.status = TaskStatus::Ongoing;
        self.touch(clock);
        Ok(())
    }

    /// Completes the task from ongoing or directly from paused.
    ///
    /// Progress becomes the override or 100. The actual duration is the
    /// supplied value, or is derived from the start and completion
    /// timestamps in whole minutes with paused time excluded or included
    /// per `paused_time`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] unless the task is
    /// ongoing or paused, or [`TaskDomainError::StartTimestampMissing`] when
    /// a duration must be derived for a task that never started.
    pub fn complete(
        &mut self,
        worker_id: Option<WorkerId>,
        progress_override: Option<Progress>,
        actual_minutes: Option<i64>,
        paused_time: PausedTimePolicy,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Completed)?;
        let started = self
            .started_at
            .ok_or(TaskDomainError::StartTimestampMissing(self.id))?;

        let now = clock.utc();
        self.fold_open_pause(now);
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
        if let Some(worker) = worker_id {
            self.worker_id = Some(worker);
        }
        self.progress = progress_override.unwrap_or(Progress::COMPLETE);
        self.actual_minutes = Some(match actual_minutes {
            Some(minutes) => minutes.max(0),
            None => {
                let elapsed = now - started;
                let counted = match paused_time {
                    PausedTimePolicy::Exclude => {
                        elapsed - TimeDelta::seconds(self.paused_seconds)
                    }
                    PausedTimePolicy::Include => elapsed,
                };
                counted.num_minutes().max(0)
            }
        });
        self.touch(clock);
        Ok(())
    }

    /// Records interim progress reported from the floor.
    ///
    /// Valid on any non-terminal task; pausing and resuming never touch the
    /// reported value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TerminalTask`] when the task already
    /// completed or failed.
    pub fn report_progress(
        &mut self,
        progress: Progress,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.status.is_terminal() {
            return Err(TaskDomainError::TerminalTask {
                task_id: self.id,
                status: self.status,
            });
        }
        self.progress = progress;
        self.touch(clock);
        Ok(())
    }

    /// Fails the task from ongoing or paused. Progress is preserved; a
    /// failed task never spawns a successor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] unless the task is
    /// ongoing or paused.
    pub fn fail(
        &mut self,
        notes: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Failed)?;
        let now = clock.utc();
        self.fold_open_pause(now);
        self.status = TaskStatus::Failed;
        if notes.is_some() {
            self.notes = notes;
        }
        self.touch(clock);
        Ok(())
    }

    /// Rejects transitions the status machine does not allow.
    fn ensure_transition(&self, to: TaskStatus) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(to) {
            return Err(TaskDomainError::InvalidTransition {
                task_id: self.id,
                from: self.status,
                to,
            });
        }
        Ok(())
    }

    /// Accumulates an open pause into the paused total.
    fn fold_open_pause(&mut self, now: DateTime<Utc>) {
        if let Some(paused_at) = self.paused_at.take() {
            let paused = (now - paused_at).num_seconds().max(0);
            self.paused_seconds = self.paused_seconds.saturating_add(paused);
        }
    }

    /// Bumps the mutation timestamp and optimistic-concurrency version.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
        self.version = self.version.saturating_add(1);
    }
}
