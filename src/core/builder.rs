//! Build orchestration logic
//!
//! Runs a single item's recipe: the optional fetch override followed by each
//! build step in order. Failures are recorded in the [`ItemOutcome`] and never
//! escape this module, so one broken grammar cannot stop the others.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::defaults;
use crate::core::config::Settings;
use crate::core::fetch::fetch_override;
use crate::core::item::{GrammarItem, ItemOutcome, ItemState, StepOutcome};
use crate::core::recipe::BuildStep;
use crate::error::StepError;
use crate::infra::filesystem;
use crate::infra::git::GitOperations;
use crate::infra::locate::PackageLocator;
use crate::infra::process::{dir_exists, CommandRunner, CommandSpec};

/// Shared, read-only state for every item in a run
#[derive(Debug, Clone)]
pub struct BuildContext {
    runner: Arc<dyn CommandRunner>,
    git: GitOperations,
    toolchain: PathBuf,
    out_dir: PathBuf,
    pin_revision: bool,
}

impl BuildContext {
    /// Create a context writing artifacts to `out_dir`
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        toolchain: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            git: GitOperations::new(runner.clone()),
            runner,
            toolchain: toolchain.into(),
            out_dir: out_dir.into(),
            pin_revision: true,
        }
    }

    /// Create a context from resolved settings
    pub fn from_settings(settings: &Settings, runner: Arc<dyn CommandRunner>) -> Self {
        let locator = PackageLocator::new(&settings.project_dir)
            .with_dependency_dir(settings.dependency_dir.clone());
        let toolchain = locator.toolchain(settings.toolchain.as_deref());
        tracing::debug!("Using toolchain {}", toolchain.display());

        Self::new(runner, toolchain, &settings.out_dir).with_pin_revision(settings.pin_revision)
    }

    /// Check out the manifest revision after fetch overrides
    #[must_use]
    pub fn with_pin_revision(mut self, pin_revision: bool) -> Self {
        self.pin_revision = pin_revision;
        self
    }

    /// Shared output directory
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn toolchain_command(&self, cwd: &Path) -> CommandSpec {
        CommandSpec::new(&self.toolchain, cwd)
    }

    /// Run one build step in its working directory
    ///
    /// Artifacts are only moved after the build command exits zero.
    pub async fn execute_step(
        &self,
        package_dir: &Path,
        step: &BuildStep,
    ) -> Result<Vec<PathBuf>, StepError> {
        let work_dir = step.work_dir(package_dir);
        if !dir_exists(&work_dir).await {
            return Err(StepError::MissingDirectory { path: work_dir });
        }

        if step.generate {
            let output = self
                .runner
                .run(&self.toolchain_command(&work_dir).arg("generate"))
                .await?;
            if !output.success {
                return Err(StepError::GenerateFailed {
                    path: work_dir,
                    diagnostics: output.diagnostics,
                });
            }
        }

        let output = self
            .runner
            .run(&self.toolchain_command(&work_dir).arg("build").arg("--wasm"))
            .await?;
        if !output.success {
            return Err(StepError::BuildFailed {
                path: work_dir,
                diagnostics: output.diagnostics,
            });
        }

        filesystem::relocate_artifacts(&work_dir, &self.out_dir, defaults::ARTIFACT_EXTENSION)
    }

    /// Run an item's whole recipe
    ///
    /// A failed fetch skips every build step. A failed build step does not
    /// stop later steps; the item is failed if any step failed.
    pub async fn run_item(&self, item: &GrammarItem) -> ItemOutcome {
        let mut outcome = ItemOutcome::new(&item.name);

        if item.recipe.fetch() {
            outcome.advance(ItemState::FetchingOverride);
            if let Err(e) =
                fetch_override(&self.git, &item.package_dir, &item.spec, self.pin_revision).await
            {
                tracing::error!("Failed to fetch {}:\n{e}", item.name);
                outcome.fetch_error = Some(e);
                outcome.advance(ItemState::Failed);
                return outcome;
            }
        }

        for (index, step) in item.recipe.steps().iter().enumerate() {
            outcome.advance(ItemState::BuildingStep(index + 1));
            let label = step.label(&item.name);
            tracing::info!("Building {label}");

            let result = self.execute_step(&item.package_dir, step).await;
            match &result {
                Ok(artifacts) => {
                    tracing::info!("Finished building {label} ({} artifacts)", artifacts.len());
                }
                Err(e) => tracing::error!("Failed to build {label}:\n{e}"),
            }
            outcome.steps.push(StepOutcome { label, result });
        }

        let last = if outcome.has_step_failure() {
            ItemState::Failed
        } else {
            ItemState::Done
        };
        outcome.advance(last);
        outcome
    }
}
