//! Projects, packages, and schemes.

use super::settings::Settings;
use super::target::Target;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A Swift package a project depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Package {
    /// A package fetched from a repository.
    Remote {
        /// Repository URL.
        url: String,
    },
    /// A package checked out on disk.
    Local {
        /// Directory of the package.
        path: PathBuf,
    },
}

/// A reference to a target of some project.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetReference {
    /// Path of the project declaring the target.
    pub project_path: PathBuf,
    /// Target name.
    pub name: String,
}

impl TargetReference {
    /// Creates a target reference.
    #[must_use]
    pub fn new(project_path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            project_path: project_path.into(),
            name: name.into(),
        }
    }
}

/// A scheme declared by a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    /// Scheme name.
    pub name: String,
    /// Targets built by the scheme.
    #[serde(default)]
    pub build_targets: Vec<TargetReference>,
    /// Targets tested by the scheme.
    #[serde(default)]
    pub test_targets: Vec<TargetReference>,
    /// Whether the test action gathers code coverage.
    #[serde(default)]
    pub code_coverage: bool,
    /// Targets the test action gathers coverage for. Empty means all.
    #[serde(default)]
    pub code_coverage_targets: Vec<TargetReference>,
    /// Target run by the scheme.
    #[serde(default)]
    pub run_target: Option<TargetReference>,
    /// Executable file the run action launches instead of a target.
    #[serde(default)]
    pub run_file_path: Option<PathBuf>,
}

impl Scheme {
    /// Every target the scheme references, in declaration order.
    pub fn referenced_targets(&self) -> impl Iterator<Item = &TargetReference> {
        self.build_targets
            .iter()
            .chain(&self.test_targets)
            .chain(&self.code_coverage_targets)
            .chain(&self.run_target)
    }

    /// Returns true if the test action gathers coverage for specific targets.
    #[must_use]
    pub fn covers_specific_targets(&self) -> bool {
        self.code_coverage && !self.code_coverage_targets.is_empty()
    }
}

/// Code coverage of the schemes generated for the whole workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CodeCoverageMode {
    /// Gather coverage for every target.
    All,
    /// Gather coverage for the targets the project schemes cover.
    Relevant,
    /// Gather coverage for the listed targets.
    Targets {
        /// Covered targets.
        #[serde(default)]
        targets: Vec<TargetReference>,
    },
}

/// A named collection of targets sharing a path and settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Directory of the project.
    pub path: PathBuf,
    /// Project name.
    pub name: String,
    /// Project-level settings.
    #[serde(default)]
    pub settings: Settings,
    /// Targets, in declaration order.
    #[serde(default)]
    pub targets: Vec<Target>,
    /// Swift packages.
    #[serde(default)]
    pub packages: Vec<Package>,
    /// Schemes.
    #[serde(default)]
    pub schemes: Vec<Scheme>,
}

impl Project {
    /// Creates a project with default settings and no targets.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            settings: Settings::default(),
            targets: Vec::new(),
            packages: Vec::new(),
            schemes: Vec::new(),
        }
    }

    /// Sets the project settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Adds a target.
    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Adds a package.
    #[must_use]
    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }

    /// Adds a scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.schemes.push(scheme);
        self
    }

    /// Looks up a target by name.
    #[must_use]
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }
}
