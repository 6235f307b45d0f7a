//! Database connection pool management.

use sqlx::{
  PgPool,
  postgres::{PgConnectOptions, PgPoolOptions},
};

/// Default maximum connections for the pool. Kept low: the directory is a
/// single-user tool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a PostgreSQL connection pool from a connection URL.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the first connection fails.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
  let options: PgConnectOptions = database_url.parse()?;
  create_pool_with_options(options, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with explicit connect options.
pub async fn create_pool_with_options(
  options: PgConnectOptions,
  max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
  PgPoolOptions::new()
    .max_connections(max_connections)
    .connect_with(options)
    .await
}
