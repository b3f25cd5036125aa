//! The task lifecycle engine: state transitions and step orchestration.
//!
//! Completion is the orchestration point of the whole system: the engine
//! locates the completed step in the owning line's snapshot and either
//! spawns the next step's pending task or records a produced unit on the
//! project. The task-status compare-and-swap is the commit point: of two
//! racing completions exactly one wins; the loser receives a conflict and
//! performs no side effect.

use crate::floor::{
    domain::{
        DeviceId, PausedTimePolicy, Progress, Task, TaskDomainError, TaskId, TaskStatus, WorkerId,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::project::{
    domain::{LineId, Project, ProjectId, ProjectLine, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::recipe::domain::execution_head;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Bounded retries for the produced-quantity write after a winning
/// completion.
const PROJECT_WRITE_ATTEMPTS: u32 = 3;

/// Request payload for starting a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartTaskRequest {
    worker_id: WorkerId,
    device_id: Option<DeviceId>,
}

impl StartTaskRequest {
    /// Creates a request for the executing worker.
    #[must_use]
    pub const fn new(worker_id: WorkerId) -> Self {
        Self {
            worker_id,
            device_id: None,
        }
    }

    /// Assigns the concrete device the task runs on.
    #[must_use]
    pub const fn with_device(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }
}

/// Request payload for completing a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompleteTaskRequest {
    worker_id: Option<WorkerId>,
    progress_override: Option<Progress>,
    actual_minutes: Option<i64>,
    paused_time: PausedTimePolicy,
}

impl CompleteTaskRequest {
    /// Creates a request with defaults: progress 100, derived duration,
    /// paused time excluded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the completing worker.
    #[must_use]
    pub const fn with_worker(mut self, worker_id: WorkerId) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    /// Overrides the final progress for partial or early completion.
    #[must_use]
    pub const fn with_progress_override(mut self, progress: Progress) -> Self {
        self.progress_override = Some(progress);
        self
    }

    /// Supplies the actual duration instead of deriving it.
    #[must_use]
    pub const fn with_actual_minutes(mut self, minutes: i64) -> Self {
        self.actual_minutes = Some(minutes);
        self
    }

    /// Chooses whether paused time counts towards a derived duration.
    #[must_use]
    pub const fn with_paused_time_policy(mut self, policy: PausedTimePolicy) -> Self {
        self.paused_time = policy;
        self
    }
}

/// Outcome of a winning completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCompletion {
    /// The completed task as persisted.
    pub task: Task,
    /// The spawned next-step task, when the completed step was not the
    /// last.
    pub successor: Option<Task>,
    /// Whether the completed step was the line's terminal step.
    pub terminal_step: bool,
    /// The project progress after the produced-quantity increment, when the
    /// step was terminal.
    pub project_progress: Option<u8>,
}

/// Errors returned by the lifecycle engine.
#[derive(Debug, Error)]
pub enum TaskEngineError {
    /// The state machine rejected the transition.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The referenced line does not belong to the project.
    #[error("project {project_id} has no line {line_id}")]
    LineNotFound {
        /// The owning project.
        project_id: ProjectId,
        /// The unresolvable line identifier.
        line_id: LineId,
    },

    /// Tasks can only be created for active projects.
    #[error("project {0} is not active (status: {1})")]
    ProjectNotActive(ProjectId, ProjectStatus),

    /// A concurrent writer completed or transitioned the task first.
    #[error("concurrent update lost for task {0}")]
    Conflict(TaskId),

    /// The produced-quantity write kept losing to concurrent project
    /// writers.
    #[error("project update contention for {0}")]
    ProjectContention(ProjectId),

    /// Only failed tasks can be reissued.
    #[error("task {task_id} cannot be reissued from status {status}")]
    ReissueRequiresFailure {
        /// The task the operator tried to reissue.
        task_id: TaskId,
        /// Its current status.
        status: TaskStatus,
    },

    /// Snapshot or project data is inconsistent with engine assumptions.
    ///
    /// Indicates a bug in freeze validation or earlier writes, never a
    /// normal user error; always logged before being returned.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Project repository operation failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
}

/// Result type for lifecycle engine operations.
pub type TaskEngineResult<T> = Result<T, TaskEngineError>;

/// Logs and wraps a broken engine assumption.
fn invariant(detail: String) -> TaskEngineError {
    tracing::error!("{detail}");
    TaskEngineError::InvariantViolation(detail)
}

/// Drives floor tasks through their lifecycle and orchestrates step
/// succession.
#[derive(Clone)]
pub struct TaskLifecycleEngine<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<T, P, C> TaskLifecycleEngine<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle engine.
    #[must_use]
    pub const fn new(tasks: Arc<T>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            projects,
            clock,
        }
    }

    /// Creates the pending task for the first step of a line's snapshot.
    ///
    /// The first step is the head of the snapshot's dependency order: no
    /// unmet dependencies, lowest order among ready steps.
    ///
    /// # Errors
    ///
    /// Returns [`TaskEngineError::ProjectNotFound`] /
    /// [`TaskEngineError::LineNotFound`] for unknown references,
    /// [`TaskEngineError::ProjectNotActive`] when the project is not
    /// active, or [`TaskEngineError::InvariantViolation`] when the frozen
    /// snapshot cannot be ordered.
    pub async fn create_initial_task(
        &self,
        project_id: ProjectId,
        line_id: LineId,
    ) -> TaskEngineResult<Task> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(TaskEngineError::ProjectNotFound(project_id))?;
        if project.status() != ProjectStatus::Active {
            return Err(TaskEngineError::ProjectNotActive(
                project_id,
                project.status(),
            ));
        }
        let line = project
            .line(line_id)
            .ok_or(TaskEngineError::LineNotFound {
                project_id,
                line_id,
            })?;

        let head = execution_head(line.snapshot().steps()).map_err(|err| {
            invariant(format!(
                "frozen snapshot of project {project_id} line {line_id} cannot be ordered: {err}"
            ))
        })?;
        let step = line.snapshot().step_by_id(head).ok_or_else(|| {
            invariant(format!(
                "ordered head step {head} missing from snapshot of project {project_id}"
            ))
        })?;

        let task = Task::for_step(project_id, line_id, step, project.name(), &*self.clock);
        self.tasks.store(&task).await?;
        Ok(task)
    }

    /// Starts a pending task: assigns the worker and optional device.
    ///
    /// # Errors
    ///
    /// Returns [`TaskEngineError::TaskNotFound`] for an unknown task,
    /// [`TaskEngineError::Domain`] unless the task is pending, or
    /// [`TaskEngineError::Conflict`] when a concurrent writer wins the
    /// optimistic check.
    pub async fn start_task(
        &self,
        task_id: TaskId,
        request: StartTaskRequest,
    ) -> TaskEngineResult<Task> {
        self.persist_task_mutation(task_id, |task, clock| {
            task.start(request.worker_id, request.device_id, clock)
        })
        .await
    }

    /// Pauses an ongoing task. Progress and elapsed time are preserved.
    ///
    /// # Errors
    ///
    /// Same not-found/transition/conflict conditions as
    /// [`TaskLifecycleEngine::start_task`].
    pub async fn pause_task(&self, task_id: TaskId) -> TaskEngineResult<Task> {
        self.persist_task_mutation(task_id, |task, clock| task.pause(clock))
            .await
    }

    /// Resumes a paused task from exactly where it left off.
    ///
    /// # Errors
    ///
    /// Same not-found/transition/conflict conditions as
    /// [`TaskLifecycleEngine::start_task`].
    pub async fn resume_task(&self, task_id: TaskId) -> TaskEngineResult<Task> {
        self.persist_task_mutation(task_id, |task, clock| task.resume(clock))
            .await
    }

    /// Completes a task and performs the succession side effect exactly
    /// once.
    ///
    /// The successor step (or the produced-quantity target) is resolved
    /// from the frozen snapshot before the status write, so a rejected
    /// completion leaves no writes at all. After the winning write the
    /// engine spawns the next step's pending task, or, on the terminal
    /// step, increments the line's produced quantity and refreshes the
    /// project progress, completing the project when every line reached its
    /// target.
    ///
    /// # Errors
    ///
    /// Returns [`TaskEngineError::TaskNotFound`] for an unknown task,
    /// [`TaskEngineError::Domain`] unless the task is ongoing or paused,
    /// [`TaskEngineError::Conflict`] when a concurrent completion wins the
    /// optimistic check, or [`TaskEngineError::InvariantViolation`] when
    /// the task references snapshot data that does not resolve.
    pub async fn complete_task(
        &self,
        task_id: TaskId,
        request: CompleteTaskRequest,
    ) -> TaskEngineResult<TaskCompletion> {
        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskEngineError::TaskNotFound(task_id))?;

        let project = self.load_owning_project(&task).await?;
        let line = self.resolve_line(&project, &task)?;
        let current_step = line.snapshot().step_by_id(task.step_id()).ok_or_else(|| {
            invariant(format!(
                "task {task_id} references step {} missing from the snapshot of project {}",
                task.step_id(),
                project.id(),
            ))
        })?;
        let next_step = line.snapshot().step_at_order(current_step.order().next());

        let expected_version = task.version();
        task.complete(
            request.worker_id,
            request.progress_override,
            request.actual_minutes,
            request.paused_time,
            &*self.clock,
        )?;
        self.tasks
            .update_versioned(&task, expected_version)
            .await
            .map_err(|err| match err {
                TaskRepositoryError::VersionMismatch { .. } => TaskEngineError::Conflict(task_id),
                other => TaskEngineError::Tasks(other),
            })?;

        // Side effects below run on the compare-and-swap winner only.
        match next_step {
            Some(step) => {
                let successor =
                    Task::for_step(project.id(), line.id(), step, project.name(), &*self.clock);
                self.tasks.store(&successor).await?;
                Ok(TaskCompletion {
                    task,
                    successor: Some(successor),
                    terminal_step: false,
                    project_progress: None,
                })
            }
            None => {
                let progress = self
                    .record_production(project.id(), task.line_id())
                    .await?;
                Ok(TaskCompletion {
                    task,
                    successor: None,
                    terminal_step: true,
                    project_progress: Some(progress),
                })
            }
        }
    }

    /// Records interim progress reported from the floor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskEngineError::TaskNotFound`] for an unknown task,
    /// [`TaskEngineError::Domain`] when the task is terminal, or
    /// [`TaskEngineError::Conflict`] when a concurrent writer wins the
    /// optimistic check.
    pub async fn report_task_progress(
        &self,
        task_id: TaskId,
        progress: Progress,
    ) -> TaskEngineResult<Task> {
        self.persist_task_mutation(task_id, |task, clock| task.report_progress(progress, clock))
            .await
    }

    /// Fails a task. Progress is preserved; no successor is spawned and no
    /// produced quantity is recorded.
    ///
    /// # Errors
    ///
    /// Same not-found/transition/conflict conditions as
    /// [`TaskLifecycleEngine::start_task`].
    pub async fn fail_task(
        &self,
        task_id: TaskId,
        notes: Option<String>,
    ) -> TaskEngineResult<Task> {
        self.persist_task_mutation(task_id, |task, clock| task.fail(notes, clock))
            .await
    }

    /// Reissues a failed step: creates a fresh pending task for the same
    /// snapshot step.
    ///
    /// Failed tasks are terminal and never spawn successors on their own;
    /// this is the explicit operator re-trigger.
    ///
    /// # Errors
    ///
    /// Returns [`TaskEngineError::TaskNotFound`] for an unknown task,
    /// [`TaskEngineError::ReissueRequiresFailure`] unless the task failed,
    /// or [`TaskEngineError::InvariantViolation`] when the task references
    /// snapshot data that does not resolve.
    pub async fn reissue_task(&self, task_id: TaskId) -> TaskEngineResult<Task> {
        let failed = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskEngineError::TaskNotFound(task_id))?;
        if failed.status() != TaskStatus::Failed {
            return Err(TaskEngineError::ReissueRequiresFailure {
                task_id,
                status: failed.status(),
            });
        }

        let project = self.load_owning_project(&failed).await?;
        let line = self.resolve_line(&project, &failed)?;
        let step = line
            .snapshot()
            .step_by_id(failed.step_id())
            .ok_or_else(|| {
                invariant(format!(
                    "failed task {task_id} references step {} missing from the snapshot of project {}",
                    failed.step_id(),
                    project.id(),
                ))
            })?;

        let replacement =
            Task::for_step(project.id(), line.id(), step, project.name(), &*self.clock);
        self.tasks.store(&replacement).await?;
        Ok(replacement)
    }

    /// Loads a task, applies a domain mutation, and persists it through the
    /// optimistic write.
    async fn persist_task_mutation<F>(
        &self,
        task_id: TaskId,
        mutate: F,
    ) -> TaskEngineResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskDomainError>,
    {
        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskEngineError::TaskNotFound(task_id))?;

        let expected_version = task.version();
        mutate(&mut task, self.clock.as_ref())?;

        self.tasks
            .update_versioned(&task, expected_version)
            .await
            .map_err(|err| match err {
                TaskRepositoryError::VersionMismatch { .. } => TaskEngineError::Conflict(task_id),
                other => TaskEngineError::Tasks(other),
            })?;
        Ok(task)
    }

    /// Loads the project a live task belongs to.
    ///
    /// A missing project for an existing task is an invariant violation,
    /// not a user error.
    async fn load_owning_project(&self, task: &Task) -> TaskEngineResult<Project> {
        let project_id = task.project_id();
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| {
                invariant(format!(
                    "task {} belongs to project {project_id}, which does not exist",
                    task.id(),
                ))
            })
    }

    /// Resolves the line a live task belongs to.
    fn resolve_line<'a>(
        &self,
        project: &'a Project,
        task: &Task,
    ) -> TaskEngineResult<&'a ProjectLine> {
        project.line(task.line_id()).ok_or_else(|| {
            invariant(format!(
                "task {} references line {} missing from project {}",
                task.id(),
                task.line_id(),
                project.id(),
            ))
        })
    }

    /// Records one produced unit on the owning line, retrying the
    /// optimistic project write a bounded number of times.
    ///
    /// Only the completion winner ever calls this, so the increment stays
    /// exactly-once even across retries.
    async fn record_production(
        &self,
        project_id: ProjectId,
        line_id: LineId,
    ) -> TaskEngineResult<u8> {
        for _ in 0..PROJECT_WRITE_ATTEMPTS {
            let mut project = self
                .projects
                .find_by_id(project_id)
                .await?
                .ok_or_else(|| {
                    invariant(format!(
                        "project {project_id} vanished while recording production"
                    ))
                })?;
            let expected_version = project.version();
            let progress = project
                .record_unit_produced(line_id, self.clock.as_ref())
                .map_err(|err| invariant(err.to_string()))?;

            match self
                .projects
                .update_versioned(&project, expected_version)
                .await
            {
                Ok(()) => return Ok(progress),
                Err(ProjectRepositoryError::VersionMismatch { .. }) => {}
                Err(other) => return Err(TaskEngineError::Projects(other)),
            }
        }
        Err(TaskEngineError::ProjectContention(project_id))
    }
}
