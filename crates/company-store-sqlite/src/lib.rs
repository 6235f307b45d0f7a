//! SQLite backend for the company directory.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The schema mirrors the PostgreSQL one;
//! rules SQLite cannot express as column checks (the hire date bound, the
//! `last_modified` refresh) are triggers.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
