//! Unit and service tests for the floor context.

mod support;
