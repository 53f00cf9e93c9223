//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress bars,
//! status messages and the end-of-run summary.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::core::item::GrammarItem;
use crate::core::manifest::VersionSpec;
use crate::core::run::RunReport;

/// Console verbosity chosen on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Only print errors
    pub quiet: bool,
    /// Number of `-v` flags
    pub verbose: u8,
}

impl OutputConfig {
    /// Create an output configuration
    pub fn new(quiet: bool, verbose: u8) -> Self {
        Self { quiet, verbose }
    }

    /// Default log level for the tracing subscriber
    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }

    /// Log filter from `RUST_LOG` directives and the verbosity flags
    ///
    /// `-v`/`-q` take precedence over `RUST_LOG`; without them `RUST_LOG`
    /// applies as given and an empty or invalid value falls back to warnings.
    pub fn env_filter(&self, rust_log: Option<&str>) -> EnvFilter {
        let builder = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.log_level()).into());
        match rust_log {
            Some(directives) if !self.quiet && self.verbose == 0 => {
                builder.parse_lossy(directives)
            }
            _ => builder.parse_lossy(""),
        }
    }

    /// Progress bar for a build of `total` grammars
    ///
    /// Hidden in quiet mode and when logging is verbose, where it would
    /// interleave with log lines.
    pub fn progress_bar(&self, total: u64) -> ProgressBar {
        if self.quiet || self.verbose > 0 {
            ProgressBar::hidden()
        } else {
            create_build_bar(total)
        }
    }

    /// Print per-item results and the run verdict
    pub fn print_summary(&self, report: &RunReport, out_dir: &Path) {
        for outcome in report.failed() {
            eprintln!("{} {}", status::ERROR, outcome.name);
            for reason in outcome.failures() {
                for line in reason.lines() {
                    eprintln!("    {line}");
                }
            }
        }

        if self.quiet {
            return;
        }

        for outcome in report.succeeded() {
            println!(
                "{} {} ({} artifacts)",
                status::SUCCESS,
                outcome.name,
                outcome.artifacts().count()
            );
        }

        let total = report.outcomes.len();
        if report.has_errors() {
            eprintln!(
                "{} {} of {total} grammars failed; {} has been cleared",
                status::ERROR,
                report.failed().count(),
                out_dir.display()
            );
        } else if total == 0 {
            println!("{} No grammars matched, nothing to build", status::INFO);
        } else {
            println!(
                "{} Built {total} grammars ({} artifacts) into {}",
                status::SUCCESS,
                report.published.len(),
                out_dir.display()
            );
        }
    }

    /// Print the resolved build plan
    pub fn print_plan(&self, items: &[GrammarItem]) {
        for item in items {
            println!("{}", plan_heading(item));
            println!("    {}", item.package_dir.display());
            for step in item.recipe.steps() {
                let generate = if step.generate { " (generate)" } else { "" };
                println!("    - {}{generate}", step.label(&item.name));
            }
        }
    }
}

/// `name (registry ^1.0)` or `name (github:owner/repo#rev, fetch)`
fn plan_heading(item: &GrammarItem) -> String {
    let source = match item.version() {
        VersionSpec::Registry(version) => format!("registry {version}"),
        VersionSpec::Vcs(source) => source.to_string(),
    };
    let fetch = if item.recipe.fetch() { ", fetch" } else { "" };
    format!("{} ({source}{fetch})", item.name)
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("    caused by: {cause}");
    }
}

/// Create a progress bar for build steps
pub fn create_build_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} grammars ({msg})")
            .expect("Invalid progress bar template")
            .progress_chars("█▓▒░"),
    );
    pb
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}
