//! Rule to detect schemes referencing targets no project declares.
//!
//! Workspace schemes are checked before project schemes. A run action
//! naming both a file path and an executable target is also reported, as
//! the file path wins.

use xcgraph_lint_core::model::{Scheme, TargetReference};
use xcgraph_lint_core::{GraphContext, GraphRule, LintingIssue};

/// Rule code for scheme-references.
pub const CODE: &str = "XG007";

/// Rule name for scheme-references.
pub const NAME: &str = "scheme-references";

/// Reports scheme targets missing from the graph and ambiguous run actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemeReferencesLinter;

impl SchemeReferencesLinter {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GraphRule for SchemeReferencesLinter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Detects schemes referencing unknown targets"
    }

    fn check(&self, ctx: &GraphContext<'_>) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        for scheme in ctx.graph.schemes() {
            let mut missing: Vec<&TargetReference> = Vec::new();
            for reference in scheme.referenced_targets() {
                let known = ctx
                    .graph
                    .target_id(&reference.project_path, &reference.name)
                    .is_some();
                if !known && !missing.contains(&reference) {
                    missing.push(reference);
                }
            }
            if !missing.is_empty() {
                let names: Vec<String> = missing
                    .iter()
                    .map(|r| format!("{} ({})", r.name, r.project_path.display()))
                    .collect();
                issues.push(LintingIssue::error(format!(
                    "Cannot find targets {} defined in {}",
                    names.join(", "),
                    scheme.name
                )));
            }
            issues.extend(lint_run_action(scheme));
        }
        issues
    }
}

fn lint_run_action(scheme: &Scheme) -> Option<LintingIssue> {
    let file_path = scheme.run_file_path.as_ref()?;
    let executable = scheme.run_target.as_ref()?;
    Some(LintingIssue::warning(format!(
        "On scheme '{}', filePath ('{}') takes precedence over executable ('{}').",
        scheme.name,
        file_path.display(),
        executable.name
    )))
}
