//! Shared CLI helpers
//!
//! Logging setup, colored console output and common arguments.

use anyhow::Result;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod output;

pub use args::CommonArgs;
pub use output::{OutputFormat, ScanReport};

/// Initializes logging to stderr; `RUST_LOG` extends the level
pub fn init_logging(level: tracing::Level) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// Prints the summary line
pub fn print_success(message: &str) {
    println!("{}", message.green());
}

/// Prints an error to stderr
pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

/// Prints an informational message
pub fn print_info(message: &str) {
    println!("{}", message);
}
