//! Run controller
//!
//! Owns the output directory contract: it is emptied before any item runs,
//! and emptied again if any item failed, so a failed run never leaves a
//! partial set of artifacts behind.

use std::path::PathBuf;
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::core::builder::BuildContext;
use crate::core::item::{GrammarItem, ItemOutcome};
use crate::core::scheduler;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Outcome of a whole run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Per-item outcomes in scheduling order
    pub outcomes: Vec<ItemOutcome>,
    /// Artifacts published to the output directory (empty after a failed run)
    pub published: Vec<PathBuf>,
}

impl RunReport {
    /// Whether any item failed
    pub fn has_errors(&self) -> bool {
        self.outcomes.iter().any(|o| !o.succeeded())
    }

    /// Items that failed
    pub fn failed(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// Items that succeeded
    pub fn succeeded(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.succeeded())
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }
}

/// Reset the output directory, build every item and publish or purge
pub async fn execute(
    ctx: Arc<BuildContext>,
    items: Vec<GrammarItem>,
    jobs: usize,
    progress: &ProgressBar,
) -> Result<RunReport, FilesystemError> {
    let out_dir = ctx.out_dir().to_path_buf();
    filesystem::reset_dir(&out_dir)?;

    tracing::info!("Building {} grammars with {} jobs", items.len(), jobs);
    let outcomes = scheduler::run_all(ctx, items, jobs, progress).await;

    let mut report = RunReport {
        outcomes,
        published: Vec::new(),
    };

    if report.has_errors() {
        tracing::warn!(
            "{} grammars failed, discarding {}",
            report.failed().count(),
            out_dir.display()
        );
        filesystem::reset_dir(&out_dir)?;
    } else {
        report.published = report
            .outcomes
            .iter()
            .flat_map(|o| o.artifacts())
            .cloned()
            .collect();
    }

    Ok(report)
}
