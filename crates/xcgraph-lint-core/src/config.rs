//! Configuration types for xcgraph-lint.

use crate::context::LintOptions;
use crate::issue::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for xcgraph-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use ("recommended" or "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity at which the run fails (default: "error").
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Linter configuration.
    #[serde(default)]
    pub linter: LinterConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Severity at which a run fails.
    #[must_use]
    pub fn fail_on(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }

    /// Generation options handed to rules.
    #[must_use]
    pub fn lint_options(&self) -> LintOptions {
        LintOptions {
            disable_bundle_accessors: self.linter.disable_bundle_accessors,
        }
    }
}

/// Linter-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Whether generated resource bundle accessors are disabled.
    #[serde(default)]
    pub disable_bundle_accessors: bool,

    /// Whether independent rules run in parallel.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Maximum number of worker threads when running in parallel.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            disable_bundle_accessors: false,
            parallel: true,
            parallelism: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.linter.parallel);
        assert!(!config.linter.disable_bundle_accessors);
        assert!(config.rules.is_empty());
        assert_eq!(config.fail_on(), Severity::Error);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "warning"

[linter]
disable_bundle_accessors = true
parallel = false

[rules.static-products]
severity = "error"

[rules.scheme-references]
enabled = false
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.fail_on(), Severity::Warning);
        assert!(config.lint_options().disable_bundle_accessors);
        assert!(!config.linter.parallel);
        assert_eq!(config.rule_severity("static-products"), Some(Severity::Error));
        assert!(!config.is_rule_enabled("scheme-references"));
        assert!(config.is_rule_enabled("target-integrity"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::parse("[linter\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::from_file(std::path::Path::new("/nonexistent/xcgraph-lint.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
