//! Production projects: frozen snapshots, quantities, and numbering.
//!
//! A project commits to producing a target quantity against point-in-time
//! snapshots of recipe or product definitions. Snapshots are frozen once at
//! creation; later edits to master data are never observable through them.
//! The module follows hexagonal architecture:
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
