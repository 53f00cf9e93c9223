//! Grammar items and their outcomes

use std::fmt;
use std::path::PathBuf;

use crate::core::manifest::{Manifest, VersionSpec};
use crate::core::recipe::{Recipe, RecipeTable};
use crate::error::{FetchError, StepError};
use crate::infra::locate::PackageLocator;

/// One grammar package scheduled for building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarItem {
    /// Package name
    pub name: String,
    /// Version specifier from the manifest
    pub spec: String,
    /// Resolved package directory
    pub package_dir: PathBuf,
    /// Steps to run
    pub recipe: Recipe,
}

impl GrammarItem {
    /// Resolve every selected manifest entry into a buildable item
    pub fn plan(
        manifest: &Manifest,
        filter: Option<&str>,
        recipes: &RecipeTable,
        locator: &PackageLocator,
    ) -> Vec<Self> {
        manifest
            .select(filter)
            .map(|entry| Self {
                name: entry.name.clone(),
                spec: entry.spec.clone(),
                package_dir: locator.locate(&entry.name),
                recipe: recipes.resolve(&entry.name),
            })
            .collect()
    }

    /// Interpret the manifest specifier
    pub fn version(&self) -> VersionSpec {
        VersionSpec::parse(&self.spec)
    }
}

/// Progress of an item through its recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    /// Not started
    Pending,
    /// Re-fetching the package from version control
    FetchingOverride,
    /// Running build step `n` (1-based)
    BuildingStep(usize),
    /// Every step succeeded
    Done,
    /// Fetch or at least one step failed
    Failed,
}

impl ItemState {
    /// Whether no further transitions happen
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::FetchingOverride => write!(f, "fetching"),
            Self::BuildingStep(n) => write!(f, "building step {n}"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result of one build step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// `name` or `name/subpath`
    pub label: String,
    /// Relocated artifacts, or why the step failed
    pub result: Result<Vec<PathBuf>, StepError>,
}

/// Result of running one item
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    /// Package name
    pub name: String,
    /// Current or final state
    pub state: ItemState,
    /// Why the fetch override failed, if it did
    pub fetch_error: Option<FetchError>,
    /// Outcomes of the steps that ran
    pub steps: Vec<StepOutcome>,
    /// Set when the item's task panicked
    pub crash: Option<String>,
}

impl ItemOutcome {
    /// Fresh outcome in the `Pending` state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ItemState::Pending,
            fetch_error: None,
            steps: Vec::new(),
            crash: None,
        }
    }

    /// Outcome for an item whose task died before reporting
    pub fn crashed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            state: ItemState::Failed,
            crash: Some(reason.into()),
            ..Self::new(name)
        }
    }

    /// Move to `next`, logging the transition
    pub fn advance(&mut self, next: ItemState) {
        tracing::debug!("{}: {} -> {}", self.name, self.state, next);
        self.state = next;
    }

    /// Whether the item finished without any failure
    pub fn succeeded(&self) -> bool {
        self.state == ItemState::Done
    }

    /// Whether any step has failed so far
    pub fn has_step_failure(&self) -> bool {
        self.steps.iter().any(|s| s.result.is_err())
    }

    /// Artifacts produced by successful steps
    pub fn artifacts(&self) -> impl Iterator<Item = &PathBuf> {
        self.steps
            .iter()
            .filter_map(|s| s.result.as_ref().ok())
            .flatten()
    }

    /// Human-readable failure reasons, labelled by step
    pub fn failures(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if let Some(crash) = &self.crash {
            reasons.push(format!("{}: crashed: {crash}", self.name));
        }
        if let Some(e) = &self.fetch_error {
            reasons.push(format!("{}: {e}", self.name));
        }
        for step in &self.steps {
            if let Err(e) = &step.result {
                reasons.push(format!("{}: {e}", step.label));
            }
        }
        reasons
    }
}
