//! Adapter implementations of the recipe ports.

pub mod memory;
