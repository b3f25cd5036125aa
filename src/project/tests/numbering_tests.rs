//! Tests for date-scoped project number allocation.

use super::support::project_with_target;
use crate::project::{
    adapters::memory::InMemoryProjectStore,
    domain::{Project, ProjectDomainError, ProjectId, ProjectNumber},
    ports::{
        ProjectFilter, ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult,
    },
    services::{NumberingError, ProjectNumberGenerator},
};
use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;

mockall::mock! {
    pub ProjectRepo {}

    #[async_trait::async_trait]
    impl ProjectRepository for ProjectRepo {
        async fn store(&self, project: &Project) -> ProjectRepositoryResult<()>;
        async fn update_versioned(
            &self,
            project: &Project,
            expected_version: u64,
        ) -> ProjectRepositoryResult<()>;
        async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;
        async fn find(&self, filter: &ProjectFilter) -> ProjectRepositoryResult<Vec<Project>>;
        async fn count_numbers_on(&self, day: NaiveDate) -> ProjectRepositoryResult<u64>;
    }
}

#[fixture]
fn store() -> Arc<InMemoryProjectStore> {
    Arc::new(InMemoryProjectStore::new())
}

/// Stores a project and persists its activation so the generator sees an
/// active, numbered-ready aggregate at the stored version.
async fn activated_project(store: &InMemoryProjectStore, clock: &DefaultClock) -> Project {
    let mut project = project_with_target(clock, 1, 1);
    store.store(&project).await.expect("store should succeed");
    let expected = project.version();
    project.activate(clock).expect("activation should succeed");
    store
        .update_versioned(&project, expected)
        .await
        .expect("activation write should succeed");
    project
}

fn taken_number() -> ProjectNumber {
    let day = NaiveDate::from_ymd_opt(2026, 8, 6).expect("valid date");
    ProjectNumber::compose("PRJ", day, 1).expect("valid number")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn allocation_sequences_in_call_order(store: Arc<InMemoryProjectStore>) {
    let clock = DefaultClock;
    let generator = ProjectNumberGenerator::new(Arc::clone(&store), Arc::new(DefaultClock));

    let mut numbers = Vec::new();
    for _ in 0..4 {
        let project = activated_project(store.as_ref(), &clock).await;
        let numbered = generator
            .allocate(&project)
            .await
            .expect("allocation should succeed");
        let number = numbered
            .project_number()
            .expect("number must be assigned")
            .clone();
        numbers.push(number);
    }

    let suffixes: Vec<&str> = numbers
        .iter()
        .map(|number| {
            number
                .as_str()
                .rsplit('-')
                .next()
                .expect("number carries a sequence")
        })
        .collect();
    assert_eq!(suffixes, vec!["001", "002", "003", "004"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn allocated_number_embeds_creation_day_and_prefix(store: Arc<InMemoryProjectStore>) {
    let clock = DefaultClock;
    let generator = ProjectNumberGenerator::new(Arc::clone(&store), Arc::new(DefaultClock))
        .with_prefix("WO");

    let project = activated_project(store.as_ref(), &clock).await;
    let numbered = generator
        .allocate(&project)
        .await
        .expect("allocation should succeed");

    let day = project.created_at().date_naive();
    let expected = format!("WO-{day}-001");
    assert_eq!(
        numbered.project_number().map(ProjectNumber::as_str),
        Some(expected.as_str())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn allocation_retries_after_uniqueness_conflict() {
    let clock = DefaultClock;
    let mut mock = MockProjectRepo::new();
    mock.expect_count_numbers_on().returning(|_| Ok(0));
    mock.expect_update_versioned()
        .times(2)
        .returning(|_, _| Err(ProjectRepositoryError::DuplicateProjectNumber(taken_number())));
    mock.expect_update_versioned()
        .times(1)
        .returning(|_, _| Ok(()));
    let generator = ProjectNumberGenerator::new(Arc::new(mock), Arc::new(DefaultClock));

    let mut project = project_with_target(&clock, 1, 1);
    project.activate(&clock).expect("activation should succeed");

    let numbered = generator
        .allocate(&project)
        .await
        .expect("third attempt should win");
    assert!(numbered.project_number().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn allocation_fails_permanently_after_retries() {
    let clock = DefaultClock;
    let mut mock = MockProjectRepo::new();
    mock.expect_count_numbers_on().returning(|_| Ok(0));
    mock.expect_update_versioned()
        .times(3)
        .returning(|_, _| Err(ProjectRepositoryError::DuplicateProjectNumber(taken_number())));
    let generator = ProjectNumberGenerator::new(Arc::new(mock), Arc::new(DefaultClock));

    let mut project = project_with_target(&clock, 1, 1);
    project.activate(&clock).expect("activation should succeed");

    let result = generator.allocate(&project).await;
    assert!(matches!(
        result,
        Err(NumberingError::SequenceExhausted { attempts: 3 })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn allocation_rejects_planning_project(store: Arc<InMemoryProjectStore>) {
    let clock = DefaultClock;
    let generator = ProjectNumberGenerator::new(Arc::clone(&store), Arc::new(DefaultClock));

    let project = project_with_target(&clock, 1, 1);
    store.store(&project).await.expect("store should succeed");

    let result = generator.allocate(&project).await;
    assert!(matches!(
        result,
        Err(NumberingError::Domain(
            ProjectDomainError::NumberRequiresActiveProject { .. }
        ))
    ));
}
