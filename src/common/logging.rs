//! Logging and tracing configuration
//!
//! Console output goes to stderr so `--json` reports on stdout stay clean.
//! An optional log file captures full request/response detail.

use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "petstore=info,warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize tracing for the CLI (stderr logging)
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate, WARN for dependencies.
pub fn init_cli() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Initialize tracing with an additional log file
///
/// Logs go to both:
/// 1. `<data dir>/logs/petstore.log`, appended, with file and line detail
/// 2. stderr, compact
///
/// Falls back to [`init_cli`] when the log file cannot be opened.
pub fn init_with_file() -> Option<PathBuf> {
    let log_file = match paths::ensure_log_dir() {
        Ok(Some(dir)) => dir.join("petstore.log"),
        Ok(None) => {
            init_cli();
            return None;
        }
        Err(e) => {
            eprintln!("Warning: Could not create log directory: {}", e);
            init_cli();
            return None;
        }
    };

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
    {
        Ok(file) => {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);

            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .compact();

            tracing_subscriber::registry()
                .with(env_filter())
                .with(file_layer)
                .with(stderr_layer)
                .init();

            Some(log_file)
        }
        Err(e) => {
            eprintln!("Warning: Could not open log file: {}", e);
            init_cli();
            None
        }
    }
}
