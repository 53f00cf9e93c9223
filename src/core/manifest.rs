//! Grammar manifest handling
//!
//! The manifest is the project's `package.json`. Every `devDependencies`
//! entry whose name starts with `tree-sitter-` is a grammar item, except the
//! runtime and CLI packages.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::config::{defaults, urls};
use crate::error::{ManifestError, SpecifierError};

/// Raw `package.json` contents we care about
#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,
}

/// One grammar dependency and its version specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Package name, unique within the manifest
    pub name: String,
    /// Version specifier exactly as written in the manifest
    pub spec: String,
}

impl ManifestEntry {
    /// Create an entry
    pub fn new(name: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }
}

/// Grammar manifest
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Build a manifest from entries; non-grammar packages are dropped
    pub fn from_entries(entries: impl IntoIterator<Item = ManifestEntry>) -> Self {
        let mut entries: Vec<ManifestEntry> =
            entries.into_iter().filter(|e| is_grammar(&e.name)).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries.dedup_by(|a, b| a.name == b.name);
        Self { entries }
    }

    /// Parse `package.json` text
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let package: PackageJson = serde_json::from_str(content)?;
        Ok(Self::from_entries(
            package
                .dev_dependencies
                .into_iter()
                .map(|(name, spec)| ManifestEntry { name, spec }),
        ))
    }

    /// Load and parse a `package.json` file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// All grammar entries, sorted by name
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Entries whose name contains `filter` (all entries when `None`)
    pub fn select<'a>(
        &'a self,
        filter: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ManifestEntry> {
        self.entries
            .iter()
            .filter(move |e| filter.map_or(true, |f| e.name.contains(f)))
    }

    /// Number of grammar entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no grammar entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether a dependency name denotes a grammar package
pub fn is_grammar(name: &str) -> bool {
    name.starts_with(defaults::GRAMMAR_PREFIX) && !defaults::NON_GRAMMAR_PACKAGES.contains(&name)
}

/// A manifest version specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// Opaque registry version (e.g. `^0.21.0`)
    Registry(String),
    /// Version-control source pinned to a revision
    Vcs(VcsSource),
}

impl VersionSpec {
    /// Classify a specifier; anything not in VCS form is a registry version
    pub fn parse(spec: &str) -> Self {
        spec.parse::<VcsSource>()
            .map_or_else(|_| Self::Registry(spec.to_string()), Self::Vcs)
    }
}

/// Version-control host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsHost {
    /// github.com
    Github,
    /// gitlab.com
    Gitlab,
    /// bitbucket.org
    Bitbucket,
}

impl VcsHost {
    /// Base URL repositories are cloned from
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Github => urls::GITHUB,
            Self::Gitlab => urls::GITLAB,
            Self::Bitbucket => urls::BITBUCKET,
        }
    }

    /// Specifier prefix for this host
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "github" => Some(Self::Github),
            "gitlab" => Some(Self::Gitlab),
            "bitbucket" => Some(Self::Bitbucket),
            _ => None,
        }
    }
}

/// Parsed `source:owner/repo#revision` specifier
///
/// The revision may not start with `-`, so it is never read as a git option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsSource {
    /// Host the repository lives on
    pub host: VcsHost,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Commit, tag or branch to check out
    pub revision: String,
}

impl VcsSource {
    /// URL passed to `git clone`
    pub fn clone_url(&self) -> String {
        format!("{}/{}/{}", self.host.base_url(), self.owner, self.repo)
    }
}

impl fmt::Display for VcsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{}#{}",
            self.host.as_str(),
            self.owner,
            self.repo,
            self.revision
        )
    }
}

fn vcs_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<host>[A-Za-z][A-Za-z0-9]*):(?P<owner>[^/#\s]+)/(?P<repo>[^/#\s]+)#(?P<rev>[^-\s]\S*)$")
            .expect("valid specifier pattern")
    })
}

impl FromStr for VcsSource {
    type Err = SpecifierError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let caps = vcs_pattern()
            .captures(spec.trim())
            .ok_or_else(|| SpecifierError::Malformed {
                spec: spec.to_string(),
            })?;

        let host_name = &caps["host"];
        let host = VcsHost::from_name(host_name).ok_or_else(|| SpecifierError::UnknownHost {
            host: host_name.to_string(),
            spec: spec.to_string(),
        })?;

        Ok(Self {
            host,
            owner: caps["owner"].to_string(),
            repo: caps["repo"].to_string(),
            revision: caps["rev"].to_string(),
        })
    }
}
