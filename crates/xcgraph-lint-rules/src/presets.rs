//! Rule presets for common configurations.

use std::collections::BTreeMap;

use xcgraph_lint_core::{GraphLinterBuilder, GraphRuleBox, ProjectRuleBox};

use crate::{
    CodeCoverageLinter, DuplicateProductNamesLinter, PrecompiledArtifactsLinter, ProductCompatibilityLinter,
    ProjectConfigurationLinter, SchemeReferencesLinter, StaticProductLinter, TargetIntegrityLinter,
};

/// Preset configurations for xcgraph-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every built-in rule.
    Recommended,
    /// The four core rules, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Every preset, in documentation order.
    pub const ALL: [Self; 2] = [Self::Recommended, Self::Minimal];

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> RuleSet {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Name used in configuration files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Minimal => "minimal",
        }
    }

    /// Looks up a preset by its configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }
}

/// Graph and project rules registered together.
///
/// A rule checking both scopes appears in both lists under one name.
#[derive(Default)]
pub struct RuleSet {
    /// Graph-wide rules, in execution order.
    pub graph_rules: Vec<GraphRuleBox>,
    /// Project-scoped rules, in execution order.
    pub project_rules: Vec<ProjectRuleBox>,
}

impl RuleSet {
    /// Keeps only the rules whose name or code is listed.
    #[must_use]
    pub fn only(mut self, selected: &[&str]) -> Self {
        self.graph_rules
            .retain(|rule| selected.contains(&rule.name()) || selected.contains(&rule.code()));
        self.project_rules
            .retain(|rule| selected.contains(&rule.name()) || selected.contains(&rule.code()));
        self
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph_rules.is_empty() && self.project_rules.is_empty()
    }

    /// Registers every rule on a linter builder.
    #[must_use]
    pub fn register(self, mut builder: GraphLinterBuilder) -> GraphLinterBuilder {
        for rule in self.project_rules {
            builder = builder.project_rule_box(rule);
        }
        for rule in self.graph_rules {
            builder = builder.graph_rule_box(rule);
        }
        builder
    }
}

/// Returns the recommended set of rules.
///
/// Includes every built-in rule:
/// - `static-products` (XG001)
/// - `project-configuration` (XG002)
/// - `product-compatibility` (XG003)
/// - `target-integrity` (XG004)
/// - `precompiled-artifacts` (XG005)
/// - `duplicate-product-names` (XG006)
/// - `scheme-references` (XG007)
/// - `code-coverage` (XG008)
#[must_use]
pub fn recommended_rules() -> RuleSet {
    RuleSet {
        graph_rules: vec![
            Box::new(StaticProductLinter::new()),
            Box::new(ProjectConfigurationLinter::new()),
            Box::new(ProductCompatibilityLinter::new()),
            Box::new(PrecompiledArtifactsLinter::new()),
            Box::new(DuplicateProductNamesLinter::new()),
            Box::new(SchemeReferencesLinter::new()),
            Box::new(CodeCoverageLinter::new()),
        ],
        project_rules: vec![
            Box::new(ProjectConfigurationLinter::new()),
            Box::new(ProductCompatibilityLinter::new()),
            Box::new(TargetIntegrityLinter::new()),
        ],
    }
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes XG001 to XG004.
#[must_use]
pub fn minimal_rules() -> RuleSet {
    RuleSet {
        graph_rules: vec![
            Box::new(StaticProductLinter::new()),
            Box::new(ProjectConfigurationLinter::new()),
            Box::new(ProductCompatibilityLinter::new()),
        ],
        project_rules: vec![
            Box::new(ProjectConfigurationLinter::new()),
            Box::new(ProductCompatibilityLinter::new()),
            Box::new(TargetIntegrityLinter::new()),
        ],
    }
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> RuleSet {
    recommended_rules()
}

/// Summary of a built-in rule, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInfo {
    /// Rule code, e.g. `XG001`.
    pub code: &'static str,
    /// Rule name used in configuration.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Whether the rule checks projects, the graph, or both.
    pub scope: &'static str,
}

/// Describes every built-in rule, ordered by code.
#[must_use]
pub fn rule_infos() -> Vec<RuleInfo> {
    let rules = all_rules();
    let mut infos: BTreeMap<&'static str, RuleInfo> = BTreeMap::new();
    for rule in &rules.project_rules {
        infos.insert(
            rule.code(),
            RuleInfo {
                code: rule.code(),
                name: rule.name(),
                description: rule.description(),
                scope: "project",
            },
        );
    }
    for rule in &rules.graph_rules {
        infos
            .entry(rule.code())
            .and_modify(|info| info.scope = "project + graph")
            .or_insert_with(|| RuleInfo {
                code: rule.code(),
                name: rule.name(),
                description: rule.description(),
                scope: "graph",
            });
    }
    infos.into_values().collect()
}
