//! Lumen CLI - Media ingestion and rendition pipeline.
//!
//! Lumen scans a source tree of photographs and audio, extracts normalized
//! metadata, and generates policy-driven image renditions into a
//! date-partitioned output tree.
//!
//! # Usage
//!
//! ```bash
//! # Ingest the configured source tree
//! lumen ingest
//!
//! # Ingest a specific directory, writing results for the storage layer
//! lumen ingest ./photos --renders ./renders --output results.json
//!
//! # View configuration
//! lumen config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Lumen - Media ingestion and rendition pipeline.
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a source tree, extract metadata, and generate renditions
    Ingest(cli::ingest::IngestArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI overrides.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match lumen_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `lumen config path`."
            );
            lumen_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Lumen v{}", lumen_core::VERSION);

    match cli.command {
        Commands::Ingest(args) => cli::ingest::execute(config, args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
