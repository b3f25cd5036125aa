//! Project number sequences through the activation flow.

use super::helpers::{factory, frame_recipe};
use rstest::rstest;
use takt::project::services::{CreateProjectRequest, ProjectLineSpec, SnapshotSourceRef};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn activations_take_consecutive_day_sequences() {
    let harness = factory();
    let recipe = harness
        .authoring
        .register_recipe(frame_recipe(1))
        .await
        .expect("registration should succeed");

    let mut suffixes = Vec::new();
    for batch in 1..=4 {
        let request = CreateProjectRequest::new(format!("Batch {batch}")).with_line(
            ProjectLineSpec::new(SnapshotSourceRef::Recipe(recipe.id()), 1),
        );
        let project = harness
            .planning
            .create_project(request)
            .await
            .expect("creation should succeed");
        let activated = harness
            .planning
            .activate_project(project.id())
            .await
            .expect("activation should succeed");
        let number = activated
            .project_number()
            .expect("number must be assigned")
            .as_str()
            .to_owned();
        let suffix = number
            .rsplit('-')
            .next()
            .expect("number carries a sequence")
            .to_owned();
        suffixes.push(suffix);
    }

    assert_eq!(suffixes, vec!["001", "002", "003", "004"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn numbers_share_one_prefix_and_day() {
    let harness = factory();
    let recipe = harness
        .authoring
        .register_recipe(frame_recipe(1))
        .await
        .expect("registration should succeed");

    let request = CreateProjectRequest::new("Batch 1").with_line(ProjectLineSpec::new(
        SnapshotSourceRef::Recipe(recipe.id()),
        1,
    ));
    let project = harness
        .planning
        .create_project(request)
        .await
        .expect("creation should succeed");
    let activated = harness
        .planning
        .activate_project(project.id())
        .await
        .expect("activation should succeed");

    let day = activated.created_at().date_naive();
    let expected = format!("PRJ-{day}-001");
    assert_eq!(
        activated.project_number().map(|number| number.as_str()),
        Some(expected.as_str())
    );
}
