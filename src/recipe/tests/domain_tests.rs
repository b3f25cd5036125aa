//! Unit tests for recipe domain construction and validation.

use crate::recipe::domain::{
    DeviceTypeId, RawMaterialId, RawMaterialRequirement, Recipe, RecipeDomainError, RecipeStep,
    StepOrder,
};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn order(value: u32) -> StepOrder {
    StepOrder::new(value).expect("positive step order")
}

#[rstest]
fn step_order_rejects_zero() {
    assert_eq!(
        StepOrder::new(0),
        Err(RecipeDomainError::InvalidStepOrder(0))
    );
}

#[rstest]
fn step_order_next_increments() -> eyre::Result<()> {
    let first = StepOrder::new(1)?;
    ensure!(first.next().value() == 2);
    Ok(())
}

#[rstest]
#[case("")]
#[case("   ")]
fn step_rejects_blank_name(#[case] name: &str) {
    let result = RecipeStep::new(name, order(1), 15);
    assert_eq!(result, Err(RecipeDomainError::EmptyStepName));
}

#[rstest]
fn step_builders_populate_optional_fields() -> eyre::Result<()> {
    let device_type = DeviceTypeId::new();
    let step = RecipeStep::new("Welding", order(2), 45)?
        .with_device_type(device_type)
        .with_description("TIG weld the frame joints");

    ensure!(step.device_type_id() == Some(device_type));
    ensure!(step.description() == Some("TIG weld the frame joints"));
    ensure!(step.estimated_minutes() == 45);
    Ok(())
}

#[rstest]
fn material_requirement_rejects_blank_code() {
    let result = RawMaterialRequirement::new(RawMaterialId::new(), "  ", "Steel", "kg", 4);
    assert_eq!(result, Err(RecipeDomainError::EmptyMaterialCode));
}

#[rstest]
fn material_requirement_rejects_zero_quantity() {
    let result = RawMaterialRequirement::new(RawMaterialId::new(), "STL-01", "Steel", "kg", 0);
    assert_eq!(result, Err(RecipeDomainError::ZeroMaterialQuantity));
}

#[rstest]
fn recipe_rejects_blank_name(clock: DefaultClock) {
    let result = Recipe::new("   ", Vec::new(), Vec::new(), &clock);
    assert!(matches!(
        result,
        Err(RecipeDomainError::EmptyDefinitionName)
    ));
}

#[rstest]
fn recipe_starts_at_version_one(clock: DefaultClock) -> eyre::Result<()> {
    let recipe = Recipe::new("Frame assembly", Vec::new(), Vec::new(), &clock)?;
    ensure!(recipe.version() == 1);
    ensure!(recipe.steps().is_empty());
    Ok(())
}

#[rstest]
fn recipe_edits_bump_the_version(clock: DefaultClock) -> eyre::Result<()> {
    let mut recipe = Recipe::new("Frame assembly", Vec::new(), Vec::new(), &clock)?;

    recipe.add_step(RecipeStep::new("Cutting", order(1), 20)?, &clock);
    ensure!(recipe.version() == 2);

    recipe.rename("Frame assembly v2", &clock)?;
    ensure!(recipe.version() == 3);
    ensure!(recipe.name() == "Frame assembly v2");
    Ok(())
}

#[rstest]
fn recipe_step_lookup_finds_by_id(clock: DefaultClock) -> eyre::Result<()> {
    let cutting = RecipeStep::new("Cutting", order(1), 20)?;
    let cutting_id = cutting.id();
    let recipe = Recipe::new("Frame assembly", vec![cutting], Vec::new(), &clock)?;

    ensure!(recipe.step_by_id(cutting_id).is_some());
    Ok(())
}
