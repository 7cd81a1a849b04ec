//! # qcatalog CLI (`qcat`)
//!
//! The `qcat` binary is the primary interface for the question catalog. It
//! provides commands for database initialization, CSV ingestion (single
//! file and bulk), catalog browsing, and favorites/progress tracking.
//!
//! ## Usage
//!
//! ```bash
//! qcat --config ./config/qcat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `qcat init` | Create the SQLite database and schema |
//! | `qcat ingest <file>` | Ingest one CSV export for a named company |
//! | `qcat bulk <dir>` | Ingest every CSV under a directory |
//! | `qcat companies` | List companies with aggregates |
//! | `qcat questions <slug>` | List one company's questions, with filters |
//! | `qcat stats` | Database totals and per-company breakdown |
//! | `qcat cleanup <pattern>` | Delete companies matching a LIKE pattern |
//! | `qcat favorites ...` | Manage favorite companies |
//! | `qcat progress ...` | Track completed questions |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! qcat init --config ./config/qcat.toml
//!
//! # Ingest a single export under an explicit company name
//! qcat ingest ./exports/acme.csv --company "Acme Corp"
//!
//! # Ingest a directory of exports, one company per file
//! qcat bulk ./exports
//!
//! # Browse
//! qcat companies
//! qcat questions acme-corp --difficulty Easy --topic "Hash Table"
//!
//! # Track progress
//! qcat favorites add acme-corp
//! qcat progress mark acme-corp 1
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use qcatalog::blob_fs::FsBlobStore;
use qcatalog::companies;
use qcatalog::config;
use qcatalog::ingest::{collect_upload_files, Ingestor};
use qcatalog::progress;
use qcatalog::questions::{self, CompletionFilter, QuestionFilters};
use qcatalog::sqlite_store::SqliteCatalogStore;
use qcatalog::stats;
use qcatalog::store::CatalogStore;

/// qcatalog CLI — a local-first catalog of company interview questions.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/qcat.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "qcat",
    about = "qcatalog — a local-first catalog of company interview questions",
    version,
    long_about = "qcatalog ingests per-company CSV exports of interview questions into a \
    SQLite catalog: parsing tolerant of messy headers and quoting, per-company difficulty \
    and topic aggregates, raw-file archiving, and local favorites/progress tracking."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/qcat.toml`. Database, blob, progress, and
    /// ingestion settings are read from this file.
    #[arg(long, global = true, default_value = "./config/qcat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and all required tables (companies,
    /// questions, company_difficulties, company_topics). This command is
    /// idempotent — running it multiple times is safe.
    Init,

    /// Ingest one CSV export under an explicit company name.
    ///
    /// Parses the file, derives aggregates, archives the raw bytes, and
    /// replaces whatever the catalog already holds for the company.
    Ingest {
        /// Path to the CSV file.
        file: PathBuf,

        /// Company display name. The slug is derived from it.
        #[arg(long)]
        company: String,
    },

    /// Ingest every CSV file under a directory.
    ///
    /// Company names are derived from file names ("acme_corp.csv" becomes
    /// "Acme Corp"). Files are processed in small concurrent groups; a file
    /// that fails is reported and skipped while the rest proceed.
    Bulk {
        /// Directory to scan for CSV files.
        dir: PathBuf,
    },

    /// List all companies with their aggregates.
    Companies,

    /// List one company's questions.
    ///
    /// Filters combine: `--difficulty Easy --topic Array` shows only easy
    /// array questions. Completion markers come from the progress store.
    Questions {
        /// Company slug (as shown by `qcat companies`).
        slug: String,

        /// Only questions with this difficulty label.
        #[arg(long)]
        difficulty: Option<String>,

        /// Only questions tagged with this topic.
        #[arg(long)]
        topic: Option<String>,

        /// Only questions whose title contains this text.
        #[arg(long)]
        search: Option<String>,

        /// Only questions already marked completed.
        #[arg(long, conflicts_with = "incomplete")]
        completed: bool,

        /// Only questions not yet completed.
        #[arg(long)]
        incomplete: bool,
    },

    /// Show database totals and a per-company breakdown.
    Stats,

    /// Delete companies whose name matches a SQL LIKE pattern.
    ///
    /// Questions and aggregates go with them. Example: `qcat cleanup
    /// "Data/%"` removes artifacts of a bad bulk run.
    Cleanup {
        /// SQL LIKE pattern matched against company names.
        pattern: String,
    },

    /// Manage favorite companies.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Track completed questions per company.
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },
}

/// Favorites subcommands.
#[derive(Subcommand)]
enum FavoritesAction {
    /// Add a company to favorites.
    Add {
        /// Company slug.
        slug: String,
    },
    /// Remove a company from favorites.
    Remove {
        /// Company slug.
        slug: String,
    },
    /// List favorites with question counts and progress.
    List,
}

/// Progress subcommands.
#[derive(Subcommand)]
enum ProgressAction {
    /// Mark a question as completed.
    Mark {
        /// Company slug.
        slug: String,
        /// Question id as shown by `qcat questions`.
        question_id: String,
    },
    /// Clear a completion mark.
    Unmark {
        /// Company slug.
        slug: String,
        /// Question id as shown by `qcat questions`.
        question_id: String,
    },
    /// Show completion state for a company.
    Show {
        /// Company slug.
        slug: String,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("qcatalog=info".parse().expect("valid directive"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let store = SqliteCatalogStore::connect(&cfg).await?;
            store.init_schema().await?;
            println!("Database initialized successfully.");
        }
        Commands::Ingest { file, company } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());

            let store = Arc::new(SqliteCatalogStore::connect(&cfg).await?);
            let blobs = Arc::new(FsBlobStore::new(cfg.blob.root.clone()));
            let ingestor = Ingestor::new(store.clone(), blobs, cfg.ingest.clone());

            let receipt = ingestor
                .ingest_file(&bytes, &file_name, Some(&company))
                .await?;

            println!("ingest {}", receipt.file_name);
            println!("  company: {} ({})", receipt.company_name, receipt.slug);
            println!("  questions: {}", receipt.total_questions);
            println!("  archived: {}", receipt.blob_url);
            if let Some(overview) = store.get_company(&receipt.slug).await? {
                if !overview.difficulties.is_empty() {
                    let line = overview
                        .difficulties
                        .iter()
                        .map(|d| format!("{} {}", d.count, d.level))
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!("  difficulty: {}", line);
                }
                if !overview.top_topics.is_empty() {
                    let line = overview
                        .top_topics
                        .iter()
                        .take(5)
                        .map(|t| t.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!("  top topics: {}", line);
                }
            }
            println!("ok");
        }
        Commands::Bulk { dir } => {
            let files = collect_upload_files(&dir, &cfg.ingest.include_globs)?;

            let store = Arc::new(SqliteCatalogStore::connect(&cfg).await?);
            let blobs = Arc::new(FsBlobStore::new(cfg.blob.root.clone()));
            let ingestor = Ingestor::new(store, blobs, cfg.ingest.clone());

            let summary = ingestor.ingest_batch(files).await?;

            println!("bulk {}", dir.display());
            for receipt in &summary.successful {
                println!(
                    "  ok      {} -> {} ({} questions)",
                    receipt.file_name, receipt.slug, receipt.total_questions
                );
            }
            for failure in &summary.failed {
                println!("  failed  {}: {}", failure.file_name, failure.reason);
            }
            println!(
                "  {} succeeded, {} failed, {} total",
                summary.successful.len(),
                summary.failed.len(),
                summary.total
            );
            println!("ok");
        }
        Commands::Companies => {
            companies::run_companies(&cfg).await?;
        }
        Commands::Questions {
            slug,
            difficulty,
            topic,
            search,
            completed,
            incomplete,
        } => {
            let completion = if completed {
                CompletionFilter::CompletedOnly
            } else if incomplete {
                CompletionFilter::IncompleteOnly
            } else {
                CompletionFilter::All
            };
            let filters = QuestionFilters {
                difficulty,
                topic,
                search,
                completion,
            };
            questions::run_questions(&cfg, &slug, &filters).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Cleanup { pattern } => {
            companies::run_cleanup(&cfg, &pattern).await?;
        }
        Commands::Favorites { action } => match action {
            FavoritesAction::Add { slug } => {
                progress::run_favorites_add(&cfg, &slug).await?;
            }
            FavoritesAction::Remove { slug } => {
                progress::run_favorites_remove(&cfg, &slug).await?;
            }
            FavoritesAction::List => {
                progress::run_favorites_list(&cfg).await?;
            }
        },
        Commands::Progress { action } => match action {
            ProgressAction::Mark { slug, question_id } => {
                progress::run_progress_mark(&cfg, &slug, &question_id).await?;
            }
            ProgressAction::Unmark { slug, question_id } => {
                progress::run_progress_unmark(&cfg, &slug, &question_id).await?;
            }
            ProgressAction::Show { slug } => {
                progress::run_progress_show(&cfg, &slug).await?;
            }
        },
    }

    Ok(())
}
