//! Shared integration test utilities

#![allow(dead_code)]

pub mod project;
pub mod registry;

pub use project::TestProject;
pub use registry::{MockRegistry, create_test_cache};
