//! End-to-end production runs over the in-memory adapters.

use super::helpers::{FactoryHarness, factory, frame_recipe};
use rstest::rstest;
use takt::floor::domain::{PausedTimePolicy, Progress, TaskStatus, WorkerId};
use takt::floor::services::{CompleteTaskRequest, StartTaskRequest, TaskCompletion};
use takt::project::domain::{LineId, Project, ProjectLine, ProjectStatus};
use takt::project::ports::ProjectRepository;
use takt::project::services::{CreateProjectRequest, ProjectLineSpec, SnapshotSourceRef};

fn only_line_id(project: &Project) -> LineId {
    project
        .lines()
        .first()
        .map(ProjectLine::id)
        .expect("project must have a line")
}

/// Registers a recipe, creates a project over it, and activates it.
async fn launched_project(harness: &FactoryHarness, steps: u32, target: u32) -> Project {
    let recipe = harness
        .authoring
        .register_recipe(frame_recipe(steps))
        .await
        .expect("registration should succeed");
    let request = CreateProjectRequest::new("Batch 7 frames").with_line(ProjectLineSpec::new(
        SnapshotSourceRef::Recipe(recipe.id()),
        target,
    ));
    let project = harness
        .planning
        .create_project(request)
        .await
        .expect("creation should succeed");
    harness
        .planning
        .activate_project(project.id())
        .await
        .expect("activation should succeed")
}

/// Runs one full pass over the line: initial task through terminal
/// completion. Returns the terminal completion.
async fn run_pass(harness: &FactoryHarness, project: &Project) -> TaskCompletion {
    let worker = WorkerId::new();
    let mut task = harness
        .engine
        .create_initial_task(project.id(), only_line_id(project))
        .await
        .expect("initial task should be created");

    loop {
        harness
            .engine
            .start_task(task.id(), StartTaskRequest::new(worker))
            .await
            .expect("start should succeed");
        let completion = harness
            .engine
            .complete_task(task.id(), CompleteTaskRequest::new().with_worker(worker))
            .await
            .expect("completion should succeed");
        match completion.successor.clone() {
            Some(next) => task = next,
            None => return completion,
        }
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_run_produces_every_unit() {
    let harness = factory();
    let project = launched_project(&harness, 3, 2).await;
    assert!(
        project
            .project_number()
            .map(|number| number.as_str().ends_with("-001"))
            .unwrap_or(false),
        "the first activation of the day takes sequence 001"
    );

    let first_pass = run_pass(&harness, &project).await;
    assert!(first_pass.terminal_step);
    assert_eq!(first_pass.project_progress, Some(50));

    let second_pass = run_pass(&harness, &project).await;
    assert_eq!(second_pass.project_progress, Some(100));

    let stored = harness
        .projects
        .find_by_id(project.id())
        .await
        .expect("lookup should succeed")
        .expect("project must exist");
    assert_eq!(stored.status(), ProjectStatus::Completed);
    assert_eq!(
        stored.lines().first().map(ProjectLine::produced_quantity),
        Some(2)
    );
    assert_eq!(stored.progress(), 100);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn single_step_single_unit_completes_in_one_call() {
    let harness = factory();
    let project = launched_project(&harness, 1, 1).await;

    let completion = run_pass(&harness, &project).await;

    assert!(completion.terminal_step);
    assert_eq!(completion.project_progress, Some(100));
    let stored = harness
        .projects
        .find_by_id(project.id())
        .await
        .expect("lookup should succeed")
        .expect("project must exist");
    assert_eq!(
        stored.lines().first().map(ProjectLine::produced_quantity),
        Some(1)
    );
    assert_eq!(stored.progress(), 100);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paused_work_resumes_where_it_left_off() {
    let harness = factory();
    let project = launched_project(&harness, 1, 1).await;
    let worker = WorkerId::new();

    let task = harness
        .engine
        .create_initial_task(project.id(), only_line_id(&project))
        .await
        .expect("initial task should be created");
    harness
        .engine
        .start_task(task.id(), StartTaskRequest::new(worker))
        .await
        .expect("start should succeed");
    harness
        .engine
        .report_task_progress(task.id(), Progress::clamped(40))
        .await
        .expect("report should succeed");
    harness
        .engine
        .pause_task(task.id())
        .await
        .expect("pause should succeed");

    let resumed = harness
        .engine
        .resume_task(task.id())
        .await
        .expect("resume should succeed");
    assert_eq!(resumed.status(), TaskStatus::Ongoing);
    assert_eq!(resumed.progress().value(), 40, "resume never resets progress");

    let completion = harness
        .engine
        .complete_task(
            task.id(),
            CompleteTaskRequest::new()
                .with_progress_override(Progress::clamped(90))
                .with_paused_time_policy(PausedTimePolicy::Include),
        )
        .await
        .expect("completion should succeed");
    assert_eq!(completion.task.progress().value(), 90);
    assert!(completion.terminal_step);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_step_is_reissued_and_finishes_the_run() {
    let harness = factory();
    let project = launched_project(&harness, 2, 1).await;
    let worker = WorkerId::new();

    let task = harness
        .engine
        .create_initial_task(project.id(), only_line_id(&project))
        .await
        .expect("initial task should be created");
    harness
        .engine
        .start_task(task.id(), StartTaskRequest::new(worker))
        .await
        .expect("start should succeed");
    harness
        .engine
        .fail_task(task.id(), Some("casting cracked".to_owned()))
        .await
        .expect("failure should be recorded");

    // The failed step spawns nothing on its own; an operator reissues it.
    let replacement = harness
        .engine
        .reissue_task(task.id())
        .await
        .expect("reissue should succeed");
    harness
        .engine
        .start_task(replacement.id(), StartTaskRequest::new(worker))
        .await
        .expect("start should succeed");
    let completion = harness
        .engine
        .complete_task(replacement.id(), CompleteTaskRequest::new())
        .await
        .expect("completion should succeed");

    let successor = completion.successor.expect("successor must be spawned");
    harness
        .engine
        .start_task(successor.id(), StartTaskRequest::new(worker))
        .await
        .expect("start should succeed");
    let terminal = harness
        .engine
        .complete_task(successor.id(), CompleteTaskRequest::new())
        .await
        .expect("completion should succeed");

    assert!(terminal.terminal_step);
    assert_eq!(terminal.project_progress, Some(100));
}
