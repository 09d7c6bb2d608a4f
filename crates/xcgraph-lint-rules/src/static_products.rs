//! Rule to detect static products linked more than once.
//!
//! # Rationale
//!
//! A static library or framework reached through two independent chains
//! ends up copied into two binaries. This is not a build error, but symbols
//! are duplicated at runtime which may introduce unwanted side effects.
//!
//! # Detection
//!
//! Every entry node is walked depth-first. Static products propagate upwards
//! until the nearest node that links them (an app, a test bundle, a dynamic
//! framework, ...). That node is the product's direct linker. A product with
//! two or more direct linkers is reported.
//!
//! # Exceptions
//!
//! - A unit test bundle hosted by an app that also links the product is not
//!   counted as a separate linker.
//! - UI test bundles run in their own process: the edge to their host app is
//!   ignored, so the app's linkage is analysed separately.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;
use xcgraph_lint_core::model::Product;
use xcgraph_lint_core::{GraphContext, GraphRule, GraphTraversal, LintingIssue, NodeId};

/// Rule code for static-products.
pub const CODE: &str = "XG001";

/// Rule name for static-products.
pub const NAME: &str = "static-products";

/// Detects static products with more than one direct linker.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticProductLinter;

impl StaticProductLinter {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GraphRule for StaticProductLinter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Detects static products linked into more than one binary"
    }

    fn check(&self, ctx: &GraphContext<'_>) -> Vec<LintingIssue> {
        let traversal = &ctx.traversal;
        let mut analysis = Analysis::new(traversal);
        let mut warnings = BTreeSet::new();

        for root in traversal.entry_nodes() {
            let products = analysis.static_products(root);
            for (&product, linkers) in &products.linked {
                let linkers = without_hosted_tests(traversal, linkers);
                if linkers.len() < 2 {
                    continue;
                }
                let node = ctx.graph.node(product);
                let mut names: Vec<String> = linkers
                    .iter()
                    .map(|&id| ctx.graph.node(id).name())
                    .collect();
                names.sort();
                warnings.insert(DuplicateLink {
                    name: node.name(),
                    linkers: names,
                    kind: node.kind_label(),
                });
            }
        }

        debug!("Found {} static products linked more than once", warnings.len());
        warnings
            .into_iter()
            .map(|w| LintingIssue::warning(w.message()))
            .collect()
    }
}

/// A static product and the nodes linking it, ordered by name then linkers.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct DuplicateLink {
    name: String,
    linkers: Vec<String>,
    kind: &'static str,
}

impl DuplicateLink {
    fn message(&self) -> String {
        let linkers = self
            .linkers
            .iter()
            .map(|l| format!("\"{l}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} \"{}\" has been linked against [{}], it is a static product so may introduce unwanted side effects.",
            self.kind, self.name, linkers
        )
    }
}

/// Static products seen below a node.
#[derive(Debug, Clone, Default)]
struct StaticProducts {
    /// Static products already linked, with their direct linkers.
    linked: BTreeMap<NodeId, BTreeSet<NodeId>>,
    /// Static products still waiting for a node that links them.
    unlinked: BTreeSet<NodeId>,
}

impl StaticProducts {
    fn merge(&mut self, other: &Self) {
        for (product, linkers) in &other.linked {
            self.linked
                .entry(*product)
                .or_default()
                .extend(linkers.iter().copied());
        }
        self.unlinked.extend(other.unlinked.iter().copied());
    }
}

/// Per-node results, shared by every root of one run.
struct Analysis<'a, 'g> {
    traversal: &'a GraphTraversal<'g>,
    cache: HashMap<NodeId, StaticProducts>,
}

impl<'a, 'g> Analysis<'a, 'g> {
    fn new(traversal: &'a GraphTraversal<'g>) -> Self {
        Self {
            traversal,
            cache: HashMap::new(),
        }
    }

    /// Computes the static products below `root`, visiting each node once.
    ///
    /// Uses an explicit post-order stack; a node met again while still on
    /// the stack closes a cycle and contributes nothing.
    fn static_products(&mut self, root: NodeId) -> &StaticProducts {
        let mut stack = vec![(root, false)];
        let mut on_path = HashSet::new();

        while let Some((node, expanded)) = stack.pop() {
            if self.cache.contains_key(&node) {
                continue;
            }
            if expanded {
                let products = self.collect(node);
                on_path.remove(&node);
                self.cache.insert(node, products);
                continue;
            }
            if !on_path.insert(node) {
                continue;
            }
            stack.push((node, true));
            for dep in self.traversal.linked_dependencies(node).into_iter().rev() {
                if !self.cache.contains_key(&dep) && !on_path.contains(&dep) {
                    stack.push((dep, false));
                }
            }
        }

        self.cache.entry(root).or_default()
    }

    fn collect(&self, node: NodeId) -> StaticProducts {
        let mut products = StaticProducts::default();
        for dep in self.traversal.linked_dependencies(node) {
            if let Some(below) = self.cache.get(&dep) {
                products.merge(below);
            }
        }

        if self.is_static(node) {
            products.unlinked.insert(node);
        } else if self.links_static_products(node) {
            for product in std::mem::take(&mut products.unlinked) {
                products.linked.entry(product).or_default().insert(node);
            }
        }
        products
    }

    fn is_static(&self, node: NodeId) -> bool {
        match self.traversal.target(node) {
            Some(target) => target.product().is_static(),
            None => self.traversal.graph().node(node).is_static_artifact(),
        }
    }

    fn links_static_products(&self, node: NodeId) -> bool {
        self.traversal
            .target(node)
            .is_some_and(|t| t.product().can_link_static_products())
    }
}

/// Drops unit test bundles whose host app is also among the linkers.
fn without_hosted_tests(traversal: &GraphTraversal<'_>, linkers: &BTreeSet<NodeId>) -> BTreeSet<NodeId> {
    linkers
        .iter()
        .copied()
        .filter(|&linker| {
            let hosted = traversal
                .target(linker)
                .is_some_and(|t| t.product() == Product::UnitTests)
                && traversal
                    .host_app(linker)
                    .is_some_and(|host| linkers.contains(&host.id));
            !hosted
        })
        .collect()
}
