//! `company` — schema setup, walkthrough, relational-algebra queries and
//! benchmarks for the Person / Customer / Employee directory.
//!
//! The database is chosen from `company.toml` (or `--config`) and the `DB_*`
//! environment variables; `--url` overrides both.
//!
//! ```
//! company init --sample-data
//! company query intersection --json
//! DB_URL=sqlite::memory: company demo
//! ```

mod bench;
mod config;
mod demo;
mod query;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use company_core::{algebra::DEFAULT_MIN_LOYALTY, store::CompanyStore};
use company_store_postgres::PgStore;
use company_store_sqlite::SqliteStore;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::{
  config::{DatabaseConfig, Target},
  query::Operator,
};

#[derive(Parser)]
#[command(author, version, about = "Person / Customer / Employee directory")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "company.toml")]
  config: PathBuf,

  /// Database URL (`postgres://…` or `sqlite:…`); overrides the config.
  #[arg(long, env = "DB_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create tables, constraints, indexes, the trigger and the views.
  Init {
    /// Also insert the sample persons, customers and employees.
    #[arg(long)]
    sample_data: bool,
  },
  /// Walk through creation, lookups and every relational-algebra operator.
  Demo {
    /// Leave the demo customer in the database.
    #[arg(long)]
    keep: bool,
  },
  /// Run a single relational-algebra operator.
  Query {
    #[arg(value_enum)]
    op: Operator,

    /// Selection threshold on loyalty points.
    #[arg(long, default_value_t = DEFAULT_MIN_LOYALTY)]
    min_loyalty: i32,

    /// Print the rows as JSON.
    #[arg(long)]
    json: bool,
  },
  /// Time the common read paths.
  Bench {
    /// Multiplier applied to every benchmark's iteration count.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut db = DatabaseConfig::load(&cli.config)?;
  if cli.url.is_some() {
    db.url = cli.url;
  }

  match db.target()? {
    Target::Postgres(options) => {
      let store = PgStore::connect_with(options, db.max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
      let outcome = run(&store, cli.command).await;
      store.close().await;
      outcome
    }
    Target::SqliteFile(path) => {
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      let outcome = run(&store, cli.command).await;
      store.close().await.context("failed to close store")?;
      outcome
    }
    Target::SqliteMemory => {
      // Nothing persists between runs, so start from the sample data.
      let store = SqliteStore::open_in_memory()
        .await
        .context("failed to open in-memory store")?;
      store.load_sample_data().await?;
      let outcome = run(&store, cli.command).await;
      store.close().await.context("failed to close store")?;
      outcome
    }
  }
}

async fn run<S: CompanyStore>(store: &S, command: Command) -> anyhow::Result<()> {
  match command {
    Command::Init { sample_data } => {
      store.apply_schema().await.context("failed to apply schema")?;
      if sample_data {
        store
          .load_sample_data()
          .await
          .context("failed to load sample data")?;
      }
      info!(sample_data, "database initialised");
      Ok(())
    }
    Command::Demo { keep } => demo::run(store, keep).await,
    Command::Query { op, min_loyalty, json } => {
      query::run(store, op, min_loyalty, json).await
    }
    Command::Bench { scale } => {
      anyhow::ensure!(scale > 0.0, "--scale must be positive, got {scale}");
      let stats = bench::run_all(store, scale).await?;
      bench::print(&stats);
      Ok(())
    }
  }
}
