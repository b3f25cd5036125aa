//! Unit and service tests for the project context.

mod support;

mod numbering_tests;
mod progress_tests;
