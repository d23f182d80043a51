//! Storage layer for sfwr
//!
//! The catalog lives in a single SQLite file; its history lives in the git
//! repository at the store root.

pub mod git;
pub mod migrations;
pub mod sqlite;

pub use git::StoreRepository;
pub use sqlite::{BookRecord, Database, NewBook};
