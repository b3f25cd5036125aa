//! Floor task execution: work orders and the lifecycle engine.
//!
//! A floor task is the unit of work one worker executes on one device for
//! one step of a project's frozen snapshot. The lifecycle engine drives
//! tasks through start, pause, resume, complete, and fail, and on completion
//! either spawns the next step's task or records a produced unit on the
//! owning project. The module follows hexagonal architecture:
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
