//! Rule to detect dependencies building products with the same file name.
//!
//! Two dependencies producing `Core.framework` end up at the same path in
//! the build products directory and overwrite each other.

use std::collections::{BTreeSet, HashSet};

use xcgraph_lint_core::{GraphContext, GraphRule, LintingIssue};

/// Rule code for duplicate-product-names.
pub const CODE: &str = "XG006";

/// Rule name for duplicate-product-names.
pub const NAME: &str = "duplicate-product-names";

/// Reports targets whose transitive dependencies share a product name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateProductNamesLinter;

impl DuplicateProductNamesLinter {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GraphRule for DuplicateProductNamesLinter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Detects dependencies sharing a built product name"
    }

    fn check(&self, ctx: &GraphContext<'_>) -> Vec<LintingIssue> {
        let traversal = &ctx.traversal;
        let mut issues = Vec::new();
        for target in traversal.all_targets() {
            let mut seen = HashSet::new();
            let duplicated: BTreeSet<String> = traversal
                .transitive_target_dependencies(target.id)
                .into_iter()
                .map(|dep| dep.target.product_name_with_extension())
                .filter(|name| !seen.insert(name.clone()))
                .collect();
            if duplicated.is_empty() {
                continue;
            }
            let names: Vec<String> = duplicated.into_iter().collect();
            issues.push(LintingIssue::warning(format!(
                "The target '{}' has dependencies with the following duplicated product names: {}",
                target.name(),
                names.join(", ")
            )));
        }
        issues
    }
}
