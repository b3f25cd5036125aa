//! Service tests for authoring registration and dependency order queries.

use std::sync::Arc;

use crate::recipe::{
    adapters::memory::InMemoryRecipeCatalog,
    domain::{GraphError, Recipe, RecipeId, RecipeStep, StepId, StepOrder},
    ports::RecipeRepository,
    services::{AuthoringError, DependencyOrderService, OrderingError, RecipeAuthoringService},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn catalog() -> Arc<InMemoryRecipeCatalog> {
    Arc::new(InMemoryRecipeCatalog::new())
}

fn order(value: u32) -> StepOrder {
    StepOrder::new(value).expect("positive step order")
}

fn linear_recipe(clock: &DefaultClock) -> Recipe {
    let cutting = RecipeStep::new("Cutting", order(1), 20).expect("valid step");
    let drilling = RecipeStep::new("Drilling", order(2), 30)
        .expect("valid step")
        .with_depends_on([cutting.id()]);
    Recipe::new("Frame assembly", vec![cutting, drilling], Vec::new(), clock)
        .expect("valid recipe")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_recipe_persists_and_is_orderable(catalog: Arc<InMemoryRecipeCatalog>) {
    let clock = DefaultClock;
    let authoring = RecipeAuthoringService::new(Arc::clone(&catalog));
    let ordering = DependencyOrderService::new(Arc::clone(&catalog));

    let recipe = authoring
        .register_recipe(linear_recipe(&clock))
        .await
        .expect("registration should succeed");

    let ordered = ordering
        .dependency_order(recipe.id())
        .await
        .expect("ordering should succeed");
    assert_eq!(ordered.len(), 2);
    assert_eq!(ordered.first().map(RecipeStep::name), Some("Cutting"));
    assert_eq!(ordered.last().map(RecipeStep::name), Some("Drilling"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_recipe_rejects_cyclic_graph(catalog: Arc<InMemoryRecipeCatalog>) {
    let clock = DefaultClock;
    let authoring = RecipeAuthoringService::new(Arc::clone(&catalog));

    let first_id = StepId::new();
    let second_id = StepId::new();
    let first = RecipeStep::new("First", order(1), 10)
        .expect("valid step")
        .with_id(first_id)
        .with_depends_on([second_id]);
    let second = RecipeStep::new("Second", order(2), 10)
        .expect("valid step")
        .with_id(second_id)
        .with_depends_on([first_id]);
    let recipe = Recipe::new("Cyclic", vec![first, second], Vec::new(), &clock)
        .expect("valid recipe");
    let recipe_id = recipe.id();

    let result = authoring.register_recipe(recipe).await;

    assert!(matches!(
        result,
        Err(AuthoringError::Graph(GraphError::CycleDetected { .. }))
    ));
    let stored = catalog
        .find_recipe(recipe_id)
        .await
        .expect("lookup should succeed");
    assert!(stored.is_none(), "rejected recipe must not be stored");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_recipe_accepts_empty_draft(catalog: Arc<InMemoryRecipeCatalog>) {
    let clock = DefaultClock;
    let authoring = RecipeAuthoringService::new(Arc::clone(&catalog));
    let draft = Recipe::new("Draft", Vec::new(), Vec::new(), &clock).expect("valid recipe");

    let registered = authoring
        .register_recipe(draft)
        .await
        .expect("draft registration should succeed");
    assert!(registered.steps().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dependency_order_reports_unknown_recipe(catalog: Arc<InMemoryRecipeCatalog>) {
    let ordering = DependencyOrderService::new(catalog);
    let missing = RecipeId::new();

    let result = ordering.dependency_order(missing).await;

    assert!(matches!(
        result,
        Err(OrderingError::RecipeNotFound(id)) if id == missing
    ));
}
