//! Build command implementation
//!
//! Loads the manifest, plans every selected grammar and hands them to the
//! run controller.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::output::OutputConfig;
use crate::core::builder::BuildContext;
use crate::core::config::Settings;
use crate::core::item::GrammarItem;
use crate::core::manifest::Manifest;
use crate::core::run::{self, RunReport};
use crate::infra::locate::PackageLocator;
use crate::infra::process::SystemRunner;

/// Execute the build
pub async fn execute(
    settings: &Settings,
    filter: Option<&str>,
    output: &OutputConfig,
) -> Result<RunReport> {
    let manifest = Manifest::load(&settings.manifest)
        .with_context(|| format!("Failed to load {}", settings.manifest.display()))?;

    let locator = PackageLocator::new(&settings.project_dir)
        .with_dependency_dir(settings.dependency_dir.clone());
    let items = GrammarItem::plan(&manifest, filter, &settings.recipes, &locator);
    if items.is_empty() {
        tracing::info!(
            "No grammars match {:?} ({} in manifest)",
            filter.unwrap_or_default(),
            manifest.len()
        );
    }

    let runner = Arc::new(SystemRunner::new().with_timeout(settings.timeout));
    let ctx = Arc::new(BuildContext::from_settings(settings, runner));

    let progress = output.progress_bar(items.len() as u64);
    let report = run::execute(ctx, items, settings.jobs, &progress)
        .await
        .with_context(|| format!("Failed to reset {}", settings.out_dir.display()))?;
    progress.finish_and_clear();

    output.print_summary(&report, &settings.out_dir);
    Ok(report)
}
