//! Dagger CLI - WD14 image interrogation and Dart prompt expansion.
//!
//! Dagger runs a WD14-family tagging model over one image or a directory of
//! images, writes comma-separated caption files, and can expand the
//! high-confidence tags into a stylized prompt with the Dart v2 model.
//!
//! # Usage
//!
//! ```bash
//! # Caption every image in a directory
//! dagger tag --dir ./images --threshold 0.35
//!
//! # Interrogate a single file and expand it with Dart
//! dagger tag --file image.png --dart
//!
//! # Manage models
//! dagger models download
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Dagger - WD14 image interrogation and Dart prompt expansion.
#[derive(Parser, Debug)]
#[command(name = "dagger")]
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
    /// Interrogate images and write caption files
    Tag(cli::tag::TagArgs),

    /// Manage model files (download, list, etc.)
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match dagger_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `dagger config path`."
            );
            dagger_core::Config::default()
        }
    };
    logging::init(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Dagger v{}", dagger_core::VERSION);

    // The resolved config is handed to every command; nothing reloads it.
    match cli.command {
        Commands::Tag(args) => cli::tag::execute(args, config).await,
        Commands::Models(args) => cli::models::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config).await,
    }
}
