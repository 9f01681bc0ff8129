/*!
# Unbom CLI

Command-line interface: converts files to UTF-8 and strips or adds the
UTF-8 BOM.
*/

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use unbom::cli_common::{
    self, output::summary_line, CommonArgs, OutputFormat, ScanReport,
};
use unbom::{
    scan, ChardetngDetector, Normalizer, Outcome, ScanError, ScanTarget, StrategyKind,
    UnbomConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "unbom",
    version = env!("CARGO_PKG_VERSION"),
    about = "Converts text files to UTF-8 and removes (or adds) the UTF-8 BOM"
)]
struct Cli {
    /// File, directory, or directory with a file name pattern (e.g. "src/*.txt")
    path: PathBuf,

    /// Recurse into subdirectories
    #[arg(short, long)]
    recurse: bool,

    /// Write a UTF-8 BOM instead of removing it
    #[arg(short = 'b', long = "set-bom")]
    set_bom: bool,

    /// How rewritten content replaces the original file
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Do not keep the .bak file (swap strategy only)
    #[arg(long)]
    nobackup: bool,

    /// Path to unbom.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[clap(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli_common::init_logging(cli.common.log_level())?;

    let mut config = match &cli.config {
        Some(path) => UnbomConfig::load_from_file(path)?,
        None => UnbomConfig::default(),
    };
    config.scan.recurse |= cli.recurse;
    config.normalize.set_bom |= cli.set_bom;
    config.normalize.keep_backup &= !cli.nobackup;
    if let Some(strategy) = cli.strategy {
        config.normalize.strategy = strategy;
    }

    tracing::debug!(
        "path={} recurse={} nobackup={}",
        cli.path.display(),
        config.scan.recurse,
        !config.normalize.keep_backup
    );

    let target = ScanTarget::parse(&cli.path, config.scan.pattern.as_deref());
    let normalizer = Normalizer::new(ChardetngDetector::new(), config.normalize.options());

    let format = cli.common.format;
    let print = cli.common.should_print();
    let mut outcomes = Vec::new();

    let result = scan(&target, config.scan.recurse, &normalizer, |outcome| {
        match format {
            OutputFormat::Text => print_outcome(outcome, print),
            OutputFormat::Json => outcomes.push(outcome.clone()),
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(err @ ScanError::DirectoryNotFound(_)) => {
            cli_common::print_error(&err.to_string());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    match format {
        OutputFormat::Text => {
            if print {
                cli_common::print_success(&summary_line(&summary));
            }
        }
        OutputFormat::Json => {
            let report = ScanReport::new(&target, summary, outcomes);
            println!("{}", report.to_json()?);
        }
    }

    Ok(())
}

fn print_outcome(outcome: &Outcome, print: bool) {
    match outcome {
        Outcome::Rewritten(report) => {
            if print {
                cli_common::print_info(&report.to_string());
            }
        }
        Outcome::Failed(failure) => cli_common::print_error(&failure.message),
        Outcome::Skipped { .. } => {}
    }
}
