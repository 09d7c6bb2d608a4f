//! Build configurations and settings.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Whether a configuration builds for debugging or for release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Debug build.
    Debug,
    /// Release build.
    Release,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => f.write_str("debug"),
            Self::Release => f.write_str("release"),
        }
    }
}

/// A named build configuration, e.g. `Debug (debug)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildConfiguration {
    /// Configuration name.
    pub name: String,
    /// Debug or release.
    pub variant: Variant,
}

impl BuildConfiguration {
    /// Creates a debug configuration.
    #[must_use]
    pub fn debug(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: Variant::Debug,
        }
    }

    /// Creates a release configuration.
    #[must_use]
    pub fn release(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: Variant::Release,
        }
    }
}

impl std::fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.variant)
    }
}

/// One configuration entry of a settings block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Configuration name.
    pub name: String,
    /// Debug or release.
    pub variant: Variant,
    /// Optional xcconfig file the configuration is based on.
    #[serde(default)]
    pub xcconfig: Option<PathBuf>,
    /// Build setting overrides.
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl Configuration {
    /// Creates a configuration with no xcconfig and no overrides.
    #[must_use]
    pub fn new(build_configuration: BuildConfiguration) -> Self {
        Self {
            name: build_configuration.name,
            variant: build_configuration.variant,
            xcconfig: None,
            settings: BTreeMap::new(),
        }
    }

    /// Sets the xcconfig path.
    #[must_use]
    pub fn with_xcconfig(mut self, path: impl Into<PathBuf>) -> Self {
        self.xcconfig = Some(path.into());
        self
    }

    /// Adds a build setting override.
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Returns the name and variant of this configuration.
    #[must_use]
    pub fn build_configuration(&self) -> BuildConfiguration {
        BuildConfiguration {
            name: self.name.clone(),
            variant: self.variant,
        }
    }
}

/// Settings of a project or a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Settings shared by every configuration.
    #[serde(default)]
    pub base: BTreeMap<String, String>,
    /// Declared configurations.
    #[serde(default = "default_configurations")]
    pub configurations: Vec<Configuration>,
    /// Name of the configuration used when none is specified.
    #[serde(default)]
    pub default_configuration: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base: BTreeMap::new(),
            configurations: default_configurations(),
            default_configuration: None,
        }
    }
}

fn default_configurations() -> Vec<Configuration> {
    vec![
        Configuration::new(BuildConfiguration::debug("Debug")),
        Configuration::new(BuildConfiguration::release("Release")),
    ]
}

impl Settings {
    /// Creates settings with the given configurations.
    #[must_use]
    pub fn with_configurations(configurations: Vec<Configuration>) -> Self {
        Self {
            configurations,
            ..Self::default()
        }
    }

    /// Sets the default configuration name.
    #[must_use]
    pub fn with_default_configuration(mut self, name: impl Into<String>) -> Self {
        self.default_configuration = Some(name.into());
        self
    }

    /// Adds a base build setting.
    #[must_use]
    pub fn with_base(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.base.insert(key.into(), value.into());
        self
    }

    /// Returns the set of declared build configurations.
    #[must_use]
    pub fn build_configurations(&self) -> BTreeSet<BuildConfiguration> {
        self.configurations
            .iter()
            .map(Configuration::build_configuration)
            .collect()
    }

    /// Returns true if a configuration named `name` is declared.
    #[must_use]
    pub fn has_configuration(&self, name: &str) -> bool {
        self.configurations.iter().any(|c| c.name == name)
    }
}
