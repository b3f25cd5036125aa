//! Unit and service tests for the recipe context.

mod domain_tests;
mod service_tests;
