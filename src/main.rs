//! # repo-scribe CLI (`scribe`)
//!
//! ## Usage
//!
//! ```bash
//! scribe --config ./config/scribe.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scribe init` | Create the SQLite database and run schema migrations |
//! | `scribe download <url>` | Clone or update a repository |
//! | `scribe repos` | List downloaded repositories |
//! | `scribe remove <owner/repo>` | Remove a repository and its descriptions |
//! | `scribe describe <path>` | Generate and store the description of one file |
//! | `scribe describe-repo <owner/repo>` | Describe every file of a repository |
//! | `scribe upsert <path> <description>` | Store a description as given |
//! | `scribe get <path>` | Show the stored description of a file |
//! | `scribe search "<query>"` | Semantic search over descriptions |
//! | `scribe embed-pending` | Embed descriptions that lack a vector from the active model |
//! | `scribe grep <pattern>` | Regex search over repository files |
//! | `scribe diff <left> <right>` | Unified diff of two files |
//! | `scribe explain <path>` | Explain a file |
//! | `scribe serve` | Start the HTTP API server |
//!
//! Logs go to stderr and are controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=repo_scribe=debug`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use repo_scribe::context::Scribe;
use repo_scribe::{config, embed_cmd, get, grep, ingest, migrate, repo, search, server};

/// repo-scribe: describe repository files with an LLM and search them by
/// meaning.
#[derive(Parser)]
#[command(
    name = "scribe",
    about = "Describe repository files with an LLM and search the descriptions",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/scribe.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// Clone a repository, or fast-forward it when already downloaded.
    Download {
        /// Clone URL (https://, http://, git://, ssh:// or git@host:owner/repo).
        url: String,
    },

    /// List downloaded repositories.
    Repos,

    /// Remove a repository: its descriptions, its files, and its record.
    Remove {
        /// Repository name as `owner/repo`.
        name: String,
    },

    /// Generate and store the description of one file.
    Describe {
        /// Resource path, e.g. `owner/repo/src/main.rs`.
        path: String,
    },

    /// Describe every file of a downloaded repository.
    DescribeRepo {
        /// Repository name as `owner/repo`.
        name: String,

        /// Describe at most this many files.
        #[arg(long)]
        limit: Option<usize>,

        /// Only count the files that would be described.
        #[arg(long)]
        dry_run: bool,
    },

    /// Store a description for a resource path as given.
    Upsert {
        path: String,
        description: String,
    },

    /// Show the stored description of a file.
    Get { path: String },

    /// Search descriptions by meaning.
    Search {
        query: String,

        /// Maximum number of results (defaults to `retrieval.default_limit`).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Embed descriptions stored without a vector from the configured model.
    EmbedPending {
        /// Embed at most this many descriptions.
        #[arg(long)]
        limit: Option<usize>,

        /// Texts per provider call (defaults to `embedding.batch_size`).
        #[arg(long)]
        batch_size: Option<usize>,

        /// Only count the descriptions that need embedding.
        #[arg(long)]
        dry_run: bool,
    },

    /// Regex search over downloaded files, most recently modified first.
    Grep {
        pattern: String,

        /// Restrict the search to one `owner/repo`.
        #[arg(long)]
        repo: Option<String>,
    },

    /// Unified diff between two files.
    Diff { left: String, right: String },

    /// Explain a file, optionally focused on a question.
    Explain {
        path: String,

        #[arg(long)]
        question: Option<String>,
    },

    /// Start the HTTP API server on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("repo_scribe=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    // Commands that only touch the filesystem.
    match &cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
            return Ok(());
        }
        Commands::Grep { pattern, repo } => {
            return grep::run_grep(&cfg.repos, repo.as_deref(), pattern);
        }
        Commands::Diff { left, right } => {
            return repo::run_diff(&cfg.repos, left, right);
        }
        _ => {}
    }

    let ctx = Scribe::open(cfg).await?;

    match cli.command {
        Commands::Download { url } => repo::run_download(&ctx, &url).await?,
        Commands::Repos => repo::run_repos(&ctx).await?,
        Commands::Remove { name } => repo::run_remove(&ctx, &name).await?,
        Commands::Describe { path } => ingest::run_describe(&ctx, &path).await?,
        Commands::DescribeRepo {
            name,
            limit,
            dry_run,
        } => ingest::run_describe_repo(&ctx, &name, limit, dry_run).await?,
        Commands::Upsert { path, description } => {
            ingest::run_upsert(&ctx, &path, &description).await?
        }
        Commands::Get { path } => get::run_get(&ctx, &path).await?,
        Commands::Search { query, limit } => search::run_search(&ctx, &query, limit).await?,
        Commands::EmbedPending {
            limit,
            batch_size,
            dry_run,
        } => embed_cmd::run_embed_pending(&ctx, limit, batch_size, dry_run).await?,
        Commands::Explain { path, question } => {
            get::run_explain(&ctx, &path, question.as_deref()).await?
        }
        Commands::Serve => server::run_server(ctx).await?,
        Commands::Init | Commands::Grep { .. } | Commands::Diff { .. } => {}
    }

    Ok(())
}
