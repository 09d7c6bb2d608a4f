//! Rule to detect precompiled artifacts missing on disk.
//!
//! Frameworks built by Carthage only get a warning: they usually appear
//! once dependencies are fetched.

use xcgraph_lint_core::{GraphContext, GraphNode, GraphRule, LintingIssue};

/// Rule code for precompiled-artifacts.
pub const CODE: &str = "XG005";

/// Rule name for precompiled-artifacts.
pub const NAME: &str = "precompiled-artifacts";

/// Reports frameworks, XCFrameworks, and libraries that do not exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecompiledArtifactsLinter;

impl PrecompiledArtifactsLinter {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GraphRule for PrecompiledArtifactsLinter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Detects precompiled frameworks and libraries missing on disk"
    }

    fn check(&self, ctx: &GraphContext<'_>) -> Vec<LintingIssue> {
        let graph = ctx.graph;
        graph
            .node_ids()
            .filter_map(|id| match graph.node(id) {
                GraphNode::Framework {
                    path, is_carthage, ..
                } if !ctx.fs.exists(path) => Some(if *is_carthage {
                    LintingIssue::warning(format!(
                        "Framework not found at path {}. The path might be wrong or Carthage dependencies not fetched",
                        path.display()
                    ))
                } else {
                    LintingIssue::error(format!("Framework not found at path {}", path.display()))
                }),
                GraphNode::XcFramework { path, .. } if !ctx.fs.exists(path) => Some(
                    LintingIssue::error(format!("XCFramework not found at path {}", path.display())),
                ),
                GraphNode::Library { path, .. } if !ctx.fs.exists(path) => Some(
                    LintingIssue::error(format!("Library not found at path {}", path.display())),
                ),
                _ => None,
            })
            .collect()
    }
}
