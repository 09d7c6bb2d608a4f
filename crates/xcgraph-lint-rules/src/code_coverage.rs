//! Rule to validate the code coverage of generated workspace schemes.
//!
//! | Mode | Issue |
//! |------|-------|
//! | `all` or unset | none |
//! | `relevant` with no scheme covering specific targets | warning |
//! | `targets` with an empty list | warning |
//! | `targets` naming a target no project declares | error |

use xcgraph_lint_core::model::CodeCoverageMode;
use xcgraph_lint_core::{GraphContext, GraphRule, LintingIssue};

/// Rule code for code-coverage.
pub const CODE: &str = "XG008";

/// Rule name for code-coverage.
pub const NAME: &str = "code-coverage";

/// Validates the workspace code coverage mode against schemes and targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeCoverageLinter;

impl CodeCoverageLinter {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GraphRule for CodeCoverageLinter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Validates the code coverage targets of workspace schemes"
    }

    fn check(&self, ctx: &GraphContext<'_>) -> Vec<LintingIssue> {
        let graph = ctx.graph;
        match graph.code_coverage_mode() {
            None | Some(CodeCoverageMode::All) => Vec::new(),
            Some(CodeCoverageMode::Relevant) => {
                if graph.schemes().any(|scheme| scheme.covers_specific_targets()) {
                    Vec::new()
                } else {
                    vec![LintingIssue::warning(
                        "Cannot find any any targets configured for code coverage, perhaps you wanted to use `CodeCoverageMode.all`?",
                    )]
                }
            }
            Some(CodeCoverageMode::Targets { targets }) if targets.is_empty() => {
                vec![LintingIssue::warning("List of targets for code coverage is empty")]
            }
            Some(CodeCoverageMode::Targets { targets }) => targets
                .iter()
                .filter(|t| graph.target_id(&t.project_path, &t.name).is_none())
                .map(|t| {
                    LintingIssue::error(format!(
                        "Target '{}' at '{}' doesn't exist",
                        t.name,
                        t.project_path.display()
                    ))
                })
                .collect(),
        }
    }
}
