//! Rule traits for defining lint rules.

use crate::context::{GraphContext, ProjectContext};
use crate::issue::LintingIssue;

/// A rule that needs the whole resolved graph.
///
/// Implement this trait for checks that follow dependency edges or compare
/// projects with each other.
///
/// # Example
///
/// ```ignore
/// use xcgraph_lint_core::{GraphContext, GraphRule, LintingIssue};
///
/// pub struct NoOrphanTargets;
///
/// impl GraphRule for NoOrphanTargets {
///     fn name(&self) -> &'static str { "no-orphan-targets" }
///     fn code(&self) -> &'static str { "XG100" }
///
///     fn check(&self, ctx: &GraphContext<'_>) -> Vec<LintingIssue> {
///         ctx.traversal
///             .entry_nodes()
///             .into_iter()
///             .filter_map(|id| ctx.traversal.target(id))
///             .filter(|t| t.target.product.is_static())
///             .map(|t| LintingIssue::warning(format!("{} is never linked", t.name())))
///             .collect()
///     }
/// }
/// ```
pub trait GraphRule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "static-products").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "XG001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Checks the graph and returns the issues found, in a stable order.
    fn check(&self, ctx: &GraphContext<'_>) -> Vec<LintingIssue>;
}

/// Type alias for boxed `GraphRule` trait objects.
pub type GraphRuleBox = Box<dyn GraphRule>;

/// A rule scoped to a single project.
///
/// Project rules run for every project of a graph, and also on their own
/// when a single project is linted.
pub trait ProjectRule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "XG004").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Checks the project and returns the issues found, in a stable order.
    fn check_project(&self, ctx: &ProjectContext<'_>) -> Vec<LintingIssue>;
}

/// Type alias for boxed `ProjectRule` trait objects.
pub type ProjectRuleBox = Box<dyn ProjectRule>;
