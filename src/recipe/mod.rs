//! Authored master data for manufacturing: recipes, products, and steps.
//!
//! A recipe (or product) is an ordered, dependency-constrained set of
//! manufacturing steps. This context owns authoring-time validation of the
//! step dependency graph and the deterministic topological ordering that the
//! rest of the system executes against. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
