//! Case store: SQLite pool setup, migrations and the `cases` repository.
//!
//! Callers import from `video_case_api::db`; the repository API is
//! re-exported here.

pub mod repo;

pub use repo::*;
