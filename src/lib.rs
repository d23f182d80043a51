//! Deployment checkpoints for a SQLite book catalog.
//!
//! The catalog (a single database file plus optional cover images) lives in a
//! git working tree. [`versioning::Versioning`] records checkpoints of it,
//! lists them newest first and restores any of them.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod storage;
pub mod test_utils;
pub mod versioning;

pub use error::{Result, SfwrError};
