//! Service tests for explicit progress recomputation.

use super::support::project_with_target;
use crate::project::{
    adapters::memory::InMemoryProjectStore,
    domain::{ProjectId, ProjectLine},
    ports::ProjectRepository,
    services::{ProgressError, ProjectProgressService},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

type TestService = ProjectProgressService<InMemoryProjectStore, DefaultClock>;

#[fixture]
fn store() -> Arc<InMemoryProjectStore> {
    Arc::new(InMemoryProjectStore::new())
}

fn service(store: &Arc<InMemoryProjectStore>) -> TestService {
    ProjectProgressService::new(Arc::clone(store), Arc::new(DefaultClock))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recompute_reflects_recorded_production(store: Arc<InMemoryProjectStore>) {
    let clock = DefaultClock;
    let mut project = project_with_target(&clock, 1, 4);
    project.activate(&clock).expect("activation should succeed");
    let line_id = project
        .lines()
        .first()
        .map(ProjectLine::id)
        .expect("project must have a line");
    store.store(&project).await.expect("store should succeed");

    let expected = project.version();
    project
        .record_unit_produced(line_id, &clock)
        .expect("production should record");
    store
        .update_versioned(&project, expected)
        .await
        .expect("write should succeed");

    let progress = service(&store)
        .recompute(project.id())
        .await
        .expect("recompute should succeed");
    assert_eq!(progress, 25);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recompute_is_idempotent_without_state_change(store: Arc<InMemoryProjectStore>) {
    let clock = DefaultClock;
    let project = project_with_target(&clock, 1, 4);
    store.store(&project).await.expect("store should succeed");
    let progress_service = service(&store);

    let first = progress_service
        .recompute(project.id())
        .await
        .expect("first recompute should succeed");
    let second = progress_service
        .recompute(project.id())
        .await
        .expect("second recompute should succeed");

    assert_eq!(first, 0);
    assert_eq!(second, 0);
    let stored = store
        .find_by_id(project.id())
        .await
        .expect("lookup should succeed")
        .expect("project must exist");
    assert_eq!(
        stored.version(),
        project.version(),
        "an unchanged value performs no write"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recompute_reports_unknown_project(store: Arc<InMemoryProjectStore>) {
    let missing = ProjectId::new();
    let result = service(&store).recompute(missing).await;
    assert!(matches!(
        result,
        Err(ProgressError::NotFound(id)) if id == missing
    ));
}
