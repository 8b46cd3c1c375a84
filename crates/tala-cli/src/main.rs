//! Tala loader and query CLI.
//!
//! Reads `tala.toml` (or the path given with `--config`), opens the SQLite
//! store, and either rebuilds it from the source workbooks (`load`) or runs
//! one of the read-only queries the downstream layers use. Query output is
//! pretty-printed JSON on stdout.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tala_core::store::{CompetencyFilter, CurriculumStore};
use tala_ingest::{IngestOptions, catalog::SourceCatalog, load_catalog};
use tala_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Tala curriculum store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "tala.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Rebuild the store from the source workbooks; prints the total
  /// competency count.
  Load,
  /// List all subjects.
  Subjects,
  /// List grades for a subject.
  Grades { subject: String },
  /// List quarters for a subject and grade.
  Quarters { subject: String, grade: String },
  /// List competencies for a subject, optionally narrowed.
  Competencies {
    subject: String,
    #[arg(long)]
    grade:   Option<String>,
    #[arg(long)]
    quarter: Option<String>,
  },
  /// Look up a single competency by row id.
  Competency { id: i64 },
  /// List standards for a subject.
  Standards { subject: String },
  /// List pedagogical approaches for a subject.
  Approaches { subject: String },
  /// List 21st-century skills for a subject (display names resolved).
  Skills { subject: String },
  /// List crosscutting concepts for a subject.
  Concepts { subject: String },
  /// List the domain sequence map for a subject.
  DomainSequence { subject: String },
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `tala.toml` with `TALA_*`
/// environment overrides.
#[derive(Deserialize)]
struct AppConfig {
  #[serde(default = "default_store_path")]
  store_path:      PathBuf,
  /// Workbook catalog. Leaving it out (or empty) selects the stock MATATAG
  /// set rooted at its `data_dir`.
  #[serde(default)]
  catalog:         SourceCatalog,
  #[serde(default)]
  strict_columns:  bool,
  #[serde(default = "default_blank_row_limit")]
  blank_row_limit: usize,
}

fn default_store_path() -> PathBuf { PathBuf::from("curriculum.db") }

fn default_blank_row_limit() -> usize { 5 }

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("TALA"))
    .build()
    .context("failed to read configuration")?;

  let app_cfg: AppConfig = settings
    .try_deserialize()
    .context("failed to deserialise configuration")?;

  let mut catalog = app_cfg.catalog;
  if catalog.subjects.is_empty() && catalog.senior.is_none() {
    catalog = SourceCatalog::matatag(catalog.data_dir);
  }

  let store = SqliteStore::open(&app_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", app_cfg.store_path)
    })?;

  match cli.command {
    Command::Load => {
      let opts = IngestOptions {
        strict_columns:  app_cfg.strict_columns,
        blank_row_limit: app_cfg.blank_row_limit,
      };
      let bundles =
        load_catalog(&catalog, &opts).context("workbook parsing failed")?;
      let count = store
        .rebuild(bundles)
        .await
        .context("store rebuild failed")?;
      tracing::info!(competencies = count, "store rebuilt");
      println!("{count}");
    }
    Command::Subjects => print_json(&store.list_subjects().await?)?,
    Command::Grades { subject } => print_json(&store.grades(&subject).await?)?,
    Command::Quarters { subject, grade } => {
      print_json(&store.quarters(&subject, &grade).await?)?;
    }
    Command::Competencies { subject, grade, quarter } => {
      let filter = CompetencyFilter { grade, quarter };
      print_json(&store.competencies(&subject, &filter).await?)?;
    }
    Command::Competency { id } => match store.competency(id).await? {
      Some(c) => print_json(&c)?,
      None => anyhow::bail!("no competency with id {id}"),
    },
    Command::Standards { subject } => {
      print_json(&store.standards(&subject).await?)?;
    }
    Command::Approaches { subject } => {
      print_json(&store.approaches(&subject).await?)?;
    }
    Command::Skills { subject } => print_json(&store.skills(&subject).await?)?,
    Command::Concepts { subject } => {
      print_json(&store.concepts(&subject).await?)?;
    }
    Command::DomainSequence { subject } => {
      print_json(&store.domain_sequence(&subject).await?)?;
    }
  }

  Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
