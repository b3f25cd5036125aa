//! Application services for recipe master data.

mod authoring;
mod ordering;

pub use authoring::{AuthoringError, AuthoringResult, RecipeAuthoringService};
pub use ordering::{DependencyOrderService, OrderingError, OrderingResult};
