//! The linter that orchestrates rule execution over a graph.

use crate::config::Config;
use crate::context::{GraphContext, LintOptions, ProjectContext};
use crate::fs::{FileSystem, OsFileSystem};
use crate::graph::Graph;
use crate::issue::{LintResult, LintingIssue};
use crate::model::Project;
use crate::rule::{GraphRule, GraphRuleBox, ProjectRule, ProjectRuleBox};

use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Builder for configuring a [`GraphLinter`].
#[derive(Default)]
pub struct GraphLinterBuilder {
    graph_rules: Vec<GraphRuleBox>,
    project_rules: Vec<ProjectRuleBox>,
    config: Option<Config>,
    fs: Option<Box<dyn FileSystem>>,
}

impl GraphLinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a graph-wide rule.
    #[must_use]
    pub fn graph_rule<R: GraphRule + 'static>(mut self, rule: R) -> Self {
        self.graph_rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed graph-wide rule.
    #[must_use]
    pub fn graph_rule_box(mut self, rule: GraphRuleBox) -> Self {
        self.graph_rules.push(rule);
        self
    }

    /// Adds a project-scoped rule.
    #[must_use]
    pub fn project_rule<R: ProjectRule + 'static>(mut self, rule: R) -> Self {
        self.project_rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed project-scoped rule.
    #[must_use]
    pub fn project_rule_box(mut self, rule: ProjectRuleBox) -> Self {
        self.project_rules.push(rule);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the file system used for existence checks (default: the real one).
    #[must_use]
    pub fn file_system<F: FileSystem + 'static>(mut self, fs: F) -> Self {
        self.fs = Some(Box::new(fs));
        self
    }

    /// Builds the linter.
    #[must_use]
    pub fn build(self) -> GraphLinter {
        GraphLinter {
            graph_rules: self.graph_rules,
            project_rules: self.project_rules,
            config: self.config.unwrap_or_default(),
            fs: self.fs.unwrap_or_else(|| Box::new(OsFileSystem)),
        }
    }
}

/// Runs rules over a graph or a single project.
///
/// Use [`GraphLinter::builder()`] to construct an instance. Project rules run
/// on every project in graph order, then graph rules run in registration
/// order. The issue order only depends on the input, whether or not rules
/// run in parallel.
pub struct GraphLinter {
    graph_rules: Vec<GraphRuleBox>,
    project_rules: Vec<ProjectRuleBox>,
    config: Config,
    fs: Box<dyn FileSystem>,
}

impl GraphLinter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> GraphLinterBuilder {
        GraphLinterBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.graph_rules.len() + self.project_rules.len()
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lints every project of the graph and the graph as a whole.
    #[must_use]
    pub fn lint(&self, graph: &Graph) -> LintResult {
        info!(
            "Linting graph '{}' with {} project(s)",
            graph.name(),
            graph.projects().len()
        );
        let options = self.config.lint_options();

        let mut result = LintResult::new();
        let projects = graph.projects();
        let per_project = self.run(
            || {
                projects
                    .par_iter()
                    .map(|project| self.project_issues(project, &options))
                    .collect::<Vec<_>>()
            },
            || {
                projects
                    .iter()
                    .map(|project| self.project_issues(project, &options))
                    .collect::<Vec<_>>()
            },
        );
        for (project, issues) in projects.iter().zip(per_project) {
            result.issues.extend(issues);
            result.projects_checked += 1;
            result.targets_checked += project.targets.len();
        }

        let ctx = GraphContext::new(graph, self.fs.as_ref(), &options);
        let rules: Vec<&GraphRuleBox> = self
            .graph_rules
            .iter()
            .filter(|rule| self.is_enabled(rule.name()))
            .collect();
        let per_rule = self.run(
            || rules.par_iter().map(|rule| rule.check(&ctx)).collect::<Vec<_>>(),
            || rules.iter().map(|rule| rule.check(&ctx)).collect::<Vec<_>>(),
        );
        for (rule, issues) in rules.iter().zip(per_rule) {
            debug!("Rule {} reported {} issue(s)", rule.name(), issues.len());
            result
                .issues
                .extend(self.apply_severity_override(rule.name(), issues));
        }

        let (errors, warnings) = result.count_by_severity();
        info!(
            "Lint complete: {} error(s), {} warning(s) in {} target(s)",
            errors, warnings, result.targets_checked
        );
        result
    }

    /// Lints a single project with the project rules only.
    #[must_use]
    pub fn lint_project(&self, project: &Project) -> LintResult {
        let options = self.config.lint_options();
        LintResult {
            issues: self.project_issues(project, &options),
            projects_checked: 1,
            targets_checked: project.targets.len(),
        }
    }

    fn project_issues(&self, project: &Project, options: &LintOptions) -> Vec<LintingIssue> {
        debug!("Linting project {} at {}", project.name, project.path.display());
        let ctx = ProjectContext::new(project, self.fs.as_ref(), options);
        let mut issues = Vec::new();
        for rule in &self.project_rules {
            if !self.is_enabled(rule.name()) {
                continue;
            }
            let found = rule.check_project(&ctx);
            issues.extend(self.apply_severity_override(rule.name(), found));
        }
        issues
    }

    fn is_enabled(&self, rule_name: &str) -> bool {
        let enabled = self.config.is_rule_enabled(rule_name);
        if !enabled {
            debug!("Skipping disabled rule: {}", rule_name);
        }
        enabled
    }

    /// Runs `parallel` on the configured pool, or `sequential` when
    /// parallelism is off or the pool cannot be created.
    fn run<T, P, S>(&self, parallel: P, sequential: S) -> T
    where
        T: Send,
        P: FnOnce() -> T + Send,
        S: FnOnce() -> T,
    {
        let linter = &self.config.linter;
        if !linter.parallel {
            return sequential();
        }
        match linter.parallelism {
            None => parallel(),
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(parallel),
                Err(e) => {
                    warn!("Failed to create a pool of {} threads: {}", threads, e);
                    sequential()
                }
            },
        }
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut issues: Vec<LintingIssue>,
    ) -> Vec<LintingIssue> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for issue in &mut issues {
                issue.severity = severity;
            }
        }
        issues
    }
}
