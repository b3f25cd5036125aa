//! Error types for recipe domain validation.

use thiserror::Error;

/// Errors returned while constructing recipe domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecipeDomainError {
    /// The recipe or product name is empty after trimming.
    #[error("definition name must not be empty")]
    EmptyDefinitionName,

    /// The step name is empty after trimming.
    #[error("step name must not be empty")]
    EmptyStepName,

    /// The step order is not a positive integer.
    #[error("invalid step order {0}, expected a positive integer")]
    InvalidStepOrder(u32),

    /// The raw material code is empty after trimming.
    #[error("raw material code must not be empty")]
    EmptyMaterialCode,

    /// The raw material quantity is zero.
    #[error("raw material quantity must be positive")]
    ZeroMaterialQuantity,
}
