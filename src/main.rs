//! # Source Cache CLI (`srcache`)
//!
//! The `srcache` binary resolves configured sources, reports which files of
//! a directory source changed since they were last reviewed, and records
//! reviews.
//!
//! ## Usage
//!
//! ```bash
//! srcache --config ./config/srcache.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `srcache sources` | List configured sources and their preferred location |
//! | `srcache refresh [id]` | Resolve one or every source |
//! | `srcache changes <id>` | Show files changed since last review |
//! | `srcache review <path>` | Record the current state of a file as reviewed |
//! | `srcache review-all <id>` | Record every changed file of a source as reviewed |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use source_cache::{config, logging, refresh_cmd, sources};

/// Source Cache CLI: resolve sources and track reviewed changes.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/srcache.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "srcache",
    about = "Resolve sources through ranked fallbacks and track changes since review",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/srcache.toml")]
    config: PathBuf,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured sources.
    Sources,

    /// Resolve sources through their candidate lists.
    ///
    /// Without an id, every configured source is refreshed concurrently.
    Refresh {
        /// Source id to refresh. Refreshes all sources when omitted.
        id: Option<String>,

        /// Print resolved records as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show files of a directory source that changed since last review.
    Changes {
        /// Source id.
        id: String,

        /// Print the change list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Record the current state of a file as reviewed.
    Review {
        /// Path to the working file.
        path: PathBuf,
    },

    /// Record every changed file of a directory source as reviewed.
    ReviewAll {
        /// Source id.
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    // Reviewing a single file only needs the history directory.
    if let Commands::Review { path } = &cli.command {
        let cfg = config::load_config(&cli.config).unwrap_or_else(|_| config::Config::minimal());
        refresh_cmd::run_review(&cfg, path).await?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Refresh { id, json } => {
            refresh_cmd::run_refresh(&cfg, id.as_deref(), json).await?;
        }
        Commands::Changes { id, json } => {
            refresh_cmd::run_changes(&cfg, &id, json).await?;
        }
        Commands::ReviewAll { id } => {
            refresh_cmd::run_review_all(&cfg, &id).await?;
        }
        Commands::Review { .. } => {}
    }

    Ok(())
}
