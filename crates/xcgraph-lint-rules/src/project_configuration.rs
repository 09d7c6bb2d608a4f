//! Rule to validate build configurations and settings.
//!
//! # Project checks
//!
//! - A project declares at least one configuration.
//! - The default configuration, when set, is one of the declared ones, for
//!   the project and for targets declaring their own configurations.
//! - Referenced xcconfig files exist, for the project and its targets.
//! - A target's own default configuration matches the project's.
//! - The deployment target platform matches the target platform.
//! - Local packages exist on disk.
//!
//! # Graph check
//!
//! Every project reached from the root projects must declare at least the
//! configurations the roots declare, with the same variant. Projects with
//! extra configurations are fine.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;
use xcgraph_lint_core::model::{BuildConfiguration, Package, Project, Settings, Target};
use xcgraph_lint_core::{
    FileSystem, GraphContext, GraphRule, LintingIssue, ProjectContext, ProjectRule,
};

/// Rule code for project-configuration.
pub const CODE: &str = "XG002";

/// Rule name for project-configuration.
pub const NAME: &str = "project-configuration";

const DESCRIPTION: &str = "Validates build configurations, xcconfig files, and deployment targets";

/// Validates configurations per project and their consistency across projects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectConfigurationLinter;

impl ProjectConfigurationLinter {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ProjectRule for ProjectConfigurationLinter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check_project(&self, ctx: &ProjectContext<'_>) -> Vec<LintingIssue> {
        let project = ctx.project;
        let mut issues = lint_project_settings(project, ctx.fs);
        for target in &project.targets {
            issues.extend(lint_target_settings(project, target, ctx.fs));
            issues.extend(lint_deployment_target(target));
        }
        issues.extend(lint_local_packages(project, ctx.fs));
        issues
    }
}

impl GraphRule for ProjectConfigurationLinter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check(&self, ctx: &GraphContext<'_>) -> Vec<LintingIssue> {
        let traversal = &ctx.traversal;
        let roots = traversal.root_projects();

        let reached: BTreeSet<_> = roots
            .iter()
            .flat_map(|root| traversal.project_dependencies(&root.path))
            .collect();
        // Roots reached from another root are dependencies, not roots.
        let mut top: Vec<&Project> = roots
            .iter()
            .copied()
            .filter(|root| !reached.contains(&root.path))
            .collect();
        if top.is_empty() {
            top.clone_from(&roots);
        }

        let expected: BTreeSet<BuildConfiguration> = top
            .iter()
            .flat_map(|project| project.settings.build_configurations())
            .collect();

        let mut checked: BTreeMap<(&str, &Path), &Project> = BTreeMap::new();
        for project in top {
            checked.insert((project.name.as_str(), project.path.as_path()), project);
        }
        for path in &reached {
            if let Some(project) = ctx.graph.project(path) {
                checked.insert((project.name.as_str(), project.path.as_path()), project);
            }
        }

        debug!(
            "Checking {} project(s) against {} expected configuration(s)",
            checked.len(),
            expected.len()
        );
        checked
            .values()
            .filter_map(|project| {
                let actual = project.settings.build_configurations();
                if expected.is_subset(&actual) {
                    None
                } else {
                    Some(LintingIssue::warning(mismatching_configurations(
                        &project.name,
                        &actual,
                        &expected,
                    )))
                }
            })
            .collect()
    }
}

fn lint_project_settings(project: &Project, fs: &dyn FileSystem) -> Vec<LintingIssue> {
    let settings = &project.settings;
    if settings.configurations.is_empty() {
        return vec![LintingIssue::error(format!(
            "The project '{}' has no configurations",
            project.name
        ))];
    }

    let mut issues: Vec<LintingIssue> = unknown_default_configuration(settings).into_iter().collect();
    issues.extend(missing_xcconfigs(settings, fs));
    issues
}

fn unknown_default_configuration(settings: &Settings) -> Option<LintingIssue> {
    let default = settings.default_configuration.as_ref()?;
    if settings.has_configuration(default) {
        return None;
    }
    let mut names: Vec<&str> = settings
        .configurations
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    names.sort_unstable();
    Some(LintingIssue::error(format!(
        "We couldn't find the default configuration '{default}'. The configurations available are: {}",
        names.join(", ")
    )))
}

fn lint_target_settings(project: &Project, target: &Target, fs: &dyn FileSystem) -> Vec<LintingIssue> {
    let Some(settings) = &target.settings else {
        return Vec::new();
    };

    let mut issues = missing_xcconfigs(settings, fs);
    // Targets without configurations of their own inherit the project's.
    if !settings.configurations.is_empty() {
        issues.extend(unknown_default_configuration(settings));
    }
    if let Some(default) = &settings.default_configuration {
        if project.settings.default_configuration.as_ref() != Some(default) {
            issues.push(LintingIssue::warning(format!(
                "The target '{}' declares the default configuration '{default}', which is overridden by the default configuration of the project '{}'",
                target.name, project.name
            )));
        }
    }
    issues
}

fn missing_xcconfigs(settings: &Settings, fs: &dyn FileSystem) -> Vec<LintingIssue> {
    settings
        .configurations
        .iter()
        .filter_map(|c| c.xcconfig.as_deref())
        .filter(|path| !fs.exists(path))
        .map(|path| {
            LintingIssue::error(format!(
                "Configuration file not found at path {}",
                path.display()
            ))
        })
        .collect()
}

fn lint_deployment_target(target: &Target) -> Option<LintingIssue> {
    let deployment = target.deployment_target.as_ref()?;
    (deployment.platform != target.platform).then(|| {
        LintingIssue::error(format!(
            "Found an inconsistency between a platform `{}` and deployment target `{}` in target '{}'",
            target.platform, deployment.platform, target.name
        ))
    })
}

fn lint_local_packages(project: &Project, fs: &dyn FileSystem) -> Vec<LintingIssue> {
    project
        .packages
        .iter()
        .filter_map(|package| match package {
            Package::Local { path } => Some(path.as_path()),
            Package::Remote { .. } => None,
        })
        .filter(|path| !fs.exists(path))
        .map(local_package_not_found)
        .collect()
}

fn local_package_not_found(path: &Path) -> LintingIssue {
    LintingIssue::error(format!(
        "Package with local path ({}) does not exist.",
        path.display()
    ))
}

fn mismatching_configurations(
    project: &str,
    actual: &BTreeSet<BuildConfiguration>,
    expected: &BTreeSet<BuildConfiguration>,
) -> String {
    format!(
        "The project '{project}' has missing or mismatching configurations. It has {}, other projects have {}",
        configuration_list(actual),
        configuration_list(expected)
    )
}

fn configuration_list(configurations: &BTreeSet<BuildConfiguration>) -> String {
    let items: Vec<String> = configurations.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
