//! Shared test utilities for sfwr.

pub mod fixtures;

pub use fixtures::{StoreFixture, git_available};
