//! Linting issues and aggregated lint results.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};

/// Severity level for linting issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory issue, generation proceeds.
    Warning,
    /// Blocking issue, generation must abort.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown severity `{other}`. Valid values: error, warning"
            )),
        }
    }
}

/// A problem detected in the graph.
///
/// Issues are plain values: two issues are the same issue when both the
/// reason and the severity match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LintingIssue {
    /// Human-readable description. Stable across runs for the same input.
    pub reason: String,
    /// Severity of this issue.
    pub severity: Severity,
}

impl LintingIssue {
    /// Creates a new issue.
    #[must_use]
    pub fn new(reason: impl Into<String>, severity: Severity) -> Self {
        Self {
            reason: reason.into(),
            severity,
        }
    }

    /// Creates a warning-level issue.
    #[must_use]
    pub fn warning(reason: impl Into<String>) -> Self {
        Self::new(reason, Severity::Warning)
    }

    /// Creates an error-level issue.
    #[must_use]
    pub fn error(reason: impl Into<String>) -> Self {
        Self::new(reason, Severity::Error)
    }

    /// Returns true if this issue blocks generation.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for LintingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.reason)
    }
}

/// Signal raised by the caller once error-level issues have been reported.
///
/// Carries no issue detail: the issues are expected to have been printed
/// before this error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Diagnostic)]
#[error("Fatal linting issues found")]
#[diagnostic(
    code(xcgraph_lint::fatal_linting_issues),
    help("fix the issues reported above and run again")
)]
pub struct FatalLintingIssues;

/// Result of running the linter over a graph or a project.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintResult {
    /// All issues found, in rule order.
    pub issues: Vec<LintingIssue>,
    /// Number of projects checked.
    pub projects_checked: usize,
    /// Number of targets checked.
    pub targets_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result holding the given issues.
    #[must_use]
    pub fn from_issues(issues: Vec<LintingIssue>) -> Self {
        Self {
            issues,
            ..Self::default()
        }
    }

    /// Returns true if there are no issues at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(LintingIssue::is_error)
    }

    /// Returns issues filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&LintingIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }

    /// Returns the error-level issues.
    #[must_use]
    pub fn errors(&self) -> Vec<&LintingIssue> {
        self.by_severity(Severity::Error)
    }

    /// Returns the warning-level issues.
    #[must_use]
    pub fn warnings(&self) -> Vec<&LintingIssue> {
        self.by_severity(Severity::Warning)
    }

    /// Counts issues by severity as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self.issues.iter().filter(|i| i.is_error()).count();
        (errors, self.issues.len() - errors)
    }

    /// Checks if any issue meets or exceeds the given severity threshold.
    #[must_use]
    pub fn has_issues_at(&self, severity: Severity) -> bool {
        self.issues.iter().any(|i| i.severity >= severity)
    }

    /// Fails with [`FatalLintingIssues`] when any error-level issue exists.
    ///
    /// # Errors
    ///
    /// Returns [`FatalLintingIssues`] if the result contains errors.
    pub fn ensure_no_errors(&self) -> Result<(), FatalLintingIssues> {
        self.ensure_below(Severity::Error)
    }

    /// Fails with [`FatalLintingIssues`] when any issue is at or above `fail_on`.
    ///
    /// # Errors
    ///
    /// Returns [`FatalLintingIssues`] if the threshold is reached.
    pub fn ensure_below(&self, fail_on: Severity) -> Result<(), FatalLintingIssues> {
        if self.has_issues_at(fail_on) {
            Err(FatalLintingIssues)
        } else {
            Ok(())
        }
    }

    /// Formats the issues as a plain-text report.
    ///
    /// Warnings are listed before errors so the blocking issues end up
    /// closest to the summary line.
    #[must_use]
    pub fn format_report(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        for issue in self.warnings().into_iter().chain(self.errors()) {
            let _ = writeln!(report, "{issue}");
        }

        let (errors, warnings) = self.count_by_severity();
        let _ = write!(
            report,
            "Found {} error(s), {} warning(s) in {} project(s), {} target(s)",
            errors, warnings, self.projects_checked, self.targets_checked
        );
        report
    }

    /// Adds issues from another result.
    pub fn extend(&mut self, other: Self) {
        self.issues.extend(other.issues);
        self.projects_checked += other.projects_checked;
        self.targets_checked += other.targets_checked;
    }
}
