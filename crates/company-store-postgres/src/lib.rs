//! PostgreSQL backend for the company directory.
//!
//! Uses a [`sqlx::PgPool`]; every multi-statement write runs in a
//! [`sqlx::Transaction`], which rolls back unless explicitly committed.

mod pool;
mod rows;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use pool::{DEFAULT_MAX_CONNECTIONS, create_pool, create_pool_with_options};
pub use store::PgStore;
