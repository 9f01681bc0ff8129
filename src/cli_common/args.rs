//! Shared command line arguments

use clap::Parser;

use super::output::OutputFormat;

/// Output and logging arguments
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CommonArgs {
    /// Picks the log level from the flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }

    /// Whether informational output is enabled
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}
