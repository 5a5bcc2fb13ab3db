//! CLI command definitions
//!
//! Defines the clap commands for the petstore CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scenario against the API (the bundled user lifecycle by default)
    Run {
        /// Path to a YAML scenario file
        #[arg(long, short)]
        scenario: Option<PathBuf>,

        /// Versioned base URL of the API (overrides config)
        #[arg(long)]
        base_url: Option<String>,

        /// Value for the api-key header (overrides config)
        #[arg(long)]
        api_key: Option<String>,

        /// Directory searched for schema files before the bundled ones
        #[arg(long)]
        schema_dir: Option<PathBuf>,

        /// Seed for the fixture generator, for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON instead of coloured progress
        #[arg(long)]
        json: bool,

        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },

    /// Print a generated fixture user as JSON
    Fixture {
        /// Seed for the fixture generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Parse a scenario file and show the requests it would send
    Check {
        /// Path to the YAML scenario file
        path: PathBuf,
    },
}
