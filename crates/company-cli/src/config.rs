//! Database settings: defaults, then an optional TOML file, then `DB_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use company_store_postgres::DEFAULT_MAX_CONNECTIONS;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Shape of the `[database]`-less TOML file and of the `DB_*` variables
/// (`DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT`, `DB_URL`,
/// `DB_MAX_CONNECTIONS`).
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
  /// Full connection URL; when set, the individual parts are ignored.
  /// `sqlite:` URLs select the SQLite backend.
  #[serde(default)]
  pub url:             Option<String>,
  pub name:            String,
  pub user:            String,
  pub password:        String,
  pub host:            String,
  pub port:            u16,
  pub max_connections: u32,
}

/// Where the store lives, resolved from a [`DatabaseConfig`].
#[derive(Debug, Clone)]
pub enum Target {
  Postgres(PgConnectOptions),
  SqliteFile(PathBuf),
  SqliteMemory,
}

impl DatabaseConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("name", "company_db")?
      .set_default("user", "postgres")?
      .set_default("password", "postgres")?
      .set_default("host", "localhost")?
      .set_default("port", 5432_i64)?
      .set_default("max_connections", i64::from(DEFAULT_MAX_CONNECTIONS))?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("DB").try_parsing(true))
      .build()
      .context("failed to read configuration")?;

    settings
      .try_deserialize()
      .context("failed to deserialise DatabaseConfig")
  }

  pub fn target(&self) -> anyhow::Result<Target> {
    let Some(url) = self.url.as_deref() else {
      return Ok(Target::Postgres(
        PgConnectOptions::new()
          .host(&self.host)
          .port(self.port)
          .username(&self.user)
          .password(&self.password)
          .database(&self.name),
      ));
    };

    if let Some(rest) = url.strip_prefix("sqlite:") {
      let path = rest.trim_start_matches("//");
      return Ok(match path {
        "" | ":memory:" => Target::SqliteMemory,
        path => Target::SqliteFile(PathBuf::from(path)),
      });
    }

    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
      let options = url
        .parse::<PgConnectOptions>()
        .with_context(|| format!("invalid database url {url:?}"))?;
      return Ok(Target::Postgres(options));
    }

    bail!("unsupported database url {url:?}: expected postgres:// or sqlite:")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config(url: Option<&str>) -> DatabaseConfig {
    DatabaseConfig {
      url:             url.map(str::to_owned),
      name:            "company_db".into(),
      user:            "postgres".into(),
      password:        "postgres".into(),
      host:            "db.internal".into(),
      port:            6543,
      max_connections: 5,
    }
  }

  #[test]
  fn parts_build_postgres_options() {
    let Target::Postgres(options) = config(None).target().unwrap() else {
      panic!("expected postgres target");
    };
    assert_eq!(options.get_host(), "db.internal");
    assert_eq!(options.get_port(), 6543);
    assert_eq!(options.get_database(), Some("company_db"));
    assert_eq!(options.get_username(), "postgres");
  }

  #[test]
  fn sqlite_urls_select_sqlite() {
    assert!(matches!(
      config(Some("sqlite::memory:")).target().unwrap(),
      Target::SqliteMemory
    ));
    match config(Some("sqlite://data/company.db")).target().unwrap() {
      Target::SqliteFile(path) => assert_eq!(path, PathBuf::from("data/company.db")),
      other => panic!("unexpected target {other:?}"),
    }
  }

  #[test]
  fn url_overrides_parts() {
    let target = config(Some("postgres://alice:pw@example.org:5433/other"))
      .target()
      .unwrap();
    let Target::Postgres(options) = target else {
      panic!("expected postgres target");
    };
    assert_eq!(options.get_host(), "example.org");
    assert_eq!(options.get_port(), 5433);
    assert_eq!(options.get_database(), Some("other"));
  }

  #[test]
  fn unknown_scheme_is_an_error() {
    assert!(config(Some("mysql://localhost/db")).target().is_err());
  }

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let cfg = DatabaseConfig::load(Path::new("does-not-exist.toml")).unwrap();
    if std::env::var_os("DB_NAME").is_none() {
      assert_eq!(cfg.name, "company_db");
    }
    if std::env::var_os("DB_MAX_CONNECTIONS").is_none() {
      assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
    }
  }
}
