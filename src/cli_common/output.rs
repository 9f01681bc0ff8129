//! Run report formatting

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::normalizer::{Outcome, RunSummary};
use crate::scanner::ScanTarget;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Report for `--format json`
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub directory: PathBuf,
    pub pattern: String,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub files: Vec<Outcome>,
}

impl ScanReport {
    /// Skipped files only count, they are not listed
    pub fn new(target: &ScanTarget, summary: RunSummary, outcomes: Vec<Outcome>) -> Self {
        Self {
            directory: target.directory.clone(),
            pattern: target.pattern.clone(),
            processed: summary.rewritten,
            skipped: summary.skipped,
            failed: summary.failed,
            files: outcomes
                .into_iter()
                .filter(|outcome| !matches!(outcome, Outcome::Skipped { .. }))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Summary line of the text report
pub fn summary_line(summary: &RunSummary) -> String {
    format!("{} file(s) processed", summary.rewritten)
}
