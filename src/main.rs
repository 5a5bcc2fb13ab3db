//! Pet-store scenario CLI
//!
//! Runs ordered HTTP scenarios against the pet-store user API and reports
//! pass/fail per step.

use std::path::PathBuf;

use clap::Parser;
use petstore::common::config::Config;
use petstore::common::logging;
use petstore::{cli, commands};
use commands::Commands;

#[derive(Parser)]
#[command(name = "petstore", about = "Ordered HTTP scenario suite for the pet-store user API")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    if config.logging.file {
        if let Some(path) = logging::init_with_file() {
            tracing::debug!(path = %path.display(), "logging to file");
        }
    } else {
        logging::init_cli();
    }

    match cli::dispatch(cli.command, config).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
