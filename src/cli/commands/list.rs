//! List command implementation
//!
//! Prints which grammars would be built, where they were found and which
//! recipe applies, without running anything.

use anyhow::{Context, Result};

use crate::cli::output::OutputConfig;
use crate::core::config::Settings;
use crate::core::item::GrammarItem;
use crate::core::manifest::Manifest;
use crate::infra::locate::PackageLocator;

/// Execute the listing
pub fn execute(settings: &Settings, filter: Option<&str>, output: &OutputConfig) -> Result<()> {
    let manifest = Manifest::load(&settings.manifest)
        .with_context(|| format!("Failed to load {}", settings.manifest.display()))?;

    let locator = PackageLocator::new(&settings.project_dir)
        .with_dependency_dir(settings.dependency_dir.clone());
    let items = GrammarItem::plan(&manifest, filter, &settings.recipes, &locator);

    output.print_plan(&items);
    Ok(())
}
