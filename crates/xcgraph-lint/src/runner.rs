//! Config-driven entry points.
//!
//! Resolution order for every setting is: explicit argument, then the
//! configuration, then the built-in default.

use tracing::debug;
use xcgraph_lint_core::model::Project;
use xcgraph_lint_core::{Config, Graph, GraphLinter, LintingIssue, Severity};
use xcgraph_lint_rules::{Preset, RuleSet};

/// Preset used when neither the caller nor the configuration names one.
const DEFAULT_PRESET: Preset = Preset::Recommended;

/// Errors raised while turning a configuration into a linter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    /// The preset name matches no built-in preset.
    #[error("unknown preset `{name}`. Valid presets: recommended, minimal")]
    UnknownPreset {
        /// The name that was given.
        name: String,
    },

    /// A rule selection matched no built-in rule.
    #[error("no built-in rule matches {selected:?}")]
    NoRulesSelected {
        /// The names or codes that were given.
        selected: Vec<String>,
    },
}

/// Lints a graph with the recommended rules against the real file system.
///
/// Issues come back in rule order: project rules per project, then graph
/// rules. The same graph always yields the same list.
#[must_use]
pub fn lint(graph: &Graph) -> Vec<LintingIssue> {
    default_linter().lint(graph).issues
}

/// Runs only the project-scoped checks of the recommended rules.
#[must_use]
pub fn lint_project(project: &Project) -> Vec<LintingIssue> {
    default_linter().lint_project(project).issues
}

/// Builds a linter from a configuration.
///
/// `preset` overrides `config.preset`; `only` restricts the preset to the
/// listed rule names or codes when not empty.
///
/// # Errors
///
/// Returns [`RunnerError`] if the preset is unknown or `only` selects nothing.
pub fn linter(preset: Option<&str>, only: &[&str], config: Config) -> Result<GraphLinter, RunnerError> {
    let preset = resolve_preset(preset, &config)?;
    let mut rules: RuleSet = preset.rules();
    if !only.is_empty() {
        rules = rules.only(only);
        if rules.is_empty() {
            return Err(RunnerError::NoRulesSelected {
                selected: only.iter().map(ToString::to_string).collect(),
            });
        }
    }
    debug!(
        "Using preset '{}' with {} graph rule(s) and {} project rule(s)",
        preset.name(),
        rules.graph_rules.len(),
        rules.project_rules.len()
    );
    Ok(rules.register(GraphLinter::builder().config(config)).build())
}

/// Resolves the effective preset from explicit argument > config > default.
///
/// # Errors
///
/// Returns [`RunnerError::UnknownPreset`] if the chosen name is unknown.
pub fn resolve_preset(explicit: Option<&str>, config: &Config) -> Result<Preset, RunnerError> {
    match explicit.or(config.preset.as_deref()) {
        None => Ok(DEFAULT_PRESET),
        Some(name) => Preset::from_name(name).ok_or_else(|| RunnerError::UnknownPreset {
            name: name.to_string(),
        }),
    }
}

/// Resolves the effective `fail_on` severity from explicit argument > config > default.
#[must_use]
pub fn resolve_fail_on(explicit: Option<Severity>, config: &Config) -> Severity {
    explicit.unwrap_or_else(|| config.fail_on())
}

fn default_linter() -> GraphLinter {
    DEFAULT_PRESET
        .rules()
        .register(GraphLinter::builder())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use xcgraph_lint_core::model::{Package, Platform, Product, Target, TargetDependency};

    #[test]
    fn resolve_preset_defaults_to_recommended() {
        let config = Config::default();
        assert_eq!(resolve_preset(None, &config), Ok(Preset::Recommended));
    }

    #[test]
    fn resolve_preset_explicit_arg_takes_precedence() {
        let mut config = Config::default();
        config.preset = Some("recommended".to_string());
        // explicit "minimal" overrides config "recommended"
        assert_eq!(resolve_preset(Some("minimal"), &config), Ok(Preset::Minimal));
    }

    #[test]
    fn resolve_preset_from_config() {
        let mut config = Config::default();
        config.preset = Some("minimal".to_string());
        assert_eq!(resolve_preset(None, &config), Ok(Preset::Minimal));
    }

    #[test]
    fn resolve_preset_invalid_is_an_error() {
        let config = Config::default();
        let err = resolve_preset(Some("strict"), &config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown preset `strict`. Valid presets: recommended, minimal"
        );
    }

    #[test]
    fn resolve_fail_on_defaults_to_error() {
        let config = Config::default();
        assert_eq!(resolve_fail_on(None, &config), Severity::Error);
    }

    #[test]
    fn resolve_fail_on_from_config() {
        let config = Config::parse("fail_on = \"warning\"\n").unwrap();
        assert_eq!(resolve_fail_on(None, &config), Severity::Warning);
    }

    #[test]
    fn resolve_fail_on_explicit_error_overrides_config() {
        let config = Config::parse("fail_on = \"warning\"\n").unwrap();
        assert_eq!(resolve_fail_on(Some(Severity::Error), &config), Severity::Error);
    }

    // ── Linter construction ──

    #[test]
    fn linter_restricted_to_selected_rules() {
        let linter = linter(None, &["XG001", "target-integrity"], Config::default()).unwrap();
        assert_eq!(linter.rule_count(), 2);
    }

    #[test]
    fn linter_rejects_empty_selection() {
        let err = linter(None, &["no-such-rule"], Config::default()).err();
        assert_eq!(
            err,
            Some(RunnerError::NoRulesSelected {
                selected: vec!["no-such-rule".to_string()]
            })
        );
    }

    // ── Entry points ──

    #[test]
    fn lint_returns_issues_of_every_scope() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::new(dir.path(), "Tools")
            .with_target(
                Target::new("Tool", Platform::MacOs, Product::CommandLineTool)
                    .with_source(Path::new("/Tools/main.swift"))
                    .with_dependency(TargetDependency::target("Kit")),
            )
            .with_target(Target::new("Kit", Platform::MacOs, Product::Framework));
        let graph = Graph::builder().project(project).build().unwrap();

        let issues = lint(&graph);
        assert_eq!(
            issues,
            vec![
                LintingIssue::warning("The target Kit doesn't contain source files."),
                LintingIssue::error(
                    "Target Tool has a dependency with target Kit of type framework for platform 'macOS' which is invalid or not supported yet."
                ),
            ]
        );
    }

    #[test]
    fn lint_project_skips_graph_checks() {
        let project = Project::new("/App", "App")
            .with_package(Package::Local { path: "/NotExists".into() });
        assert_eq!(
            lint_project(&project),
            vec![LintingIssue::error("Package with local path (/NotExists) does not exist.")]
        );
    }
}
