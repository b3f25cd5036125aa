//! Adapter implementations of the floor ports.

pub mod memory;
